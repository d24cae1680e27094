use std::path::Path;

/// Sequence of destination file names tried when placing an asset.
///
/// The first candidate is the source's own file name; every following candidate appends
/// `_N` to the stem, keeping the extension: `pic.png`, `pic_1.png`, `pic_2.png`, ...
#[derive(Debug, Clone)]
pub struct DestinationCandidates {
    stem: String,
    suffix: String,
    next_index: usize,
}

impl DestinationCandidates {
    /// Build the candidate sequence for a source file.
    pub fn for_source(source: &Path) -> Self {
        let stem = source
            .file_stem()
            .map(|value| value.to_string_lossy().into_owned())
            .unwrap_or_default();
        let suffix = source
            .extension()
            .map(|value| format!(".{}", value.to_string_lossy()))
            .unwrap_or_default();

        Self {
            stem,
            suffix,
            next_index: 0,
        }
    }
}

impl Iterator for DestinationCandidates {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let candidate = if self.next_index == 0 {
            format!("{}{}", self.stem, self.suffix)
        } else {
            format!("{}_{}{}", self.stem, self.next_index, self.suffix)
        };
        self.next_index += 1;
        Some(candidate)
    }
}
