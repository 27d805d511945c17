pub mod batch;
pub mod check;
pub mod query;

/// One-line summary of a vector for text output.
pub fn summarize(vector: &[f32]) -> String {
    const PREVIEW: usize = 4;
    let preview: Vec<String> = vector
        .iter()
        .take(PREVIEW)
        .map(|v| format!("{v:.4}"))
        .collect();
    let ellipsis = if vector.len() > PREVIEW { ", ..." } else { "" };
    format!("dim={} [{}{ellipsis}]", vector.len(), preview.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarize_truncates_long_vectors() {
        let summary = summarize(&[0.1, 0.2, 0.3, 0.4, 0.5]);
        assert_eq!(summary, "dim=5 [0.1000, 0.2000, 0.3000, 0.4000, ...]");
    }

    #[test]
    fn summarize_empty_vector() {
        assert_eq!(summarize(&[]), "dim=0 []");
    }
}
