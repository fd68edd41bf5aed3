pub const DEFAULT_AVATARS: [&str; 9] = [
    "angry.png",
    "awkward.png",
    "die.png",
    "laugh.png",
    "money.png",
    "noface.png",
    "none.png",
    "sad.png",
    "shy.png",
];

/// Avatar images handed out by row, wrapping around the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Avatars {
    files: Vec<String>,
}

impl Default for Avatars {
    fn default() -> Self {
        Self::new(DEFAULT_AVATARS.iter().map(|s| s.to_string()).collect())
    }
}

impl Avatars {
    pub fn new(files: Vec<String>) -> Self {
        Self { files }
    }

    pub fn for_row(&self, index: usize) -> Option<&str> {
        if self.files.is_empty() {
            return None;
        }
        Some(&self.files[index % self.files.len()])
    }

    /// Relative asset path of the row's avatar.
    pub fn path_for_row(&self, index: usize) -> Option<String> {
        self.for_row(index).map(|file| format!("assets/avatars/{file}"))
    }

    /// A short text face standing in for the image in the terminal.
    pub fn glyph_for_row(&self, index: usize) -> String {
        let Some(file) = self.for_row(index) else {
            return "(·)".to_string();
        };
        let stem = file.rsplit_once('.').map_or(file, |(stem, _)| stem);
        match stem {
            "angry" => ">:(".to_string(),
            "awkward" => "^^;".to_string(),
            "die" => "x_x".to_string(),
            "laugh" => ":D ".to_string(),
            "money" => "$_$".to_string(),
            "noface" => "   ".to_string(),
            "none" => ":| ".to_string(),
            "sad" => ":( ".to_string(),
            "shy" => "^/^".to_string(),
            other => {
                let initial = other.chars().next().unwrap_or('?').to_uppercase();
                format!("({initial})")
            }
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycles_by_row() {
        let avatars = Avatars::default();
        assert_eq!(avatars.len(), 9);
        assert_eq!(avatars.for_row(0), Some("angry.png"));
        assert_eq!(avatars.for_row(8), Some("shy.png"));
        assert_eq!(avatars.for_row(9), Some("angry.png"));
        assert_eq!(avatars.for_row(21), Some("laugh.png"));
    }

    #[test]
    fn test_custom_list() {
        let avatars = Avatars::new(vec!["a.png".into(), "b.png".into()]);
        assert_eq!(avatars.for_row(3), Some("b.png"));
        assert_eq!(avatars.path_for_row(2).as_deref(), Some("assets/avatars/a.png"));
    }

    #[test]
    fn test_empty_list() {
        let avatars = Avatars::new(Vec::new());
        assert!(avatars.is_empty());
        assert_eq!(avatars.for_row(5), None);
        assert_eq!(avatars.glyph_for_row(5), "(·)");
    }

    #[test]
    fn test_glyphs() {
        let avatars = Avatars::default();
        assert_eq!(avatars.glyph_for_row(0), ">:(");
        assert_eq!(avatars.glyph_for_row(3), ":D ");
        let custom = Avatars::new(vec!["zebra.webp".into()]);
        assert_eq!(custom.glyph_for_row(0), "(Z)");
    }
}
