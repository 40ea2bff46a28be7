use once_cell::sync::Lazy;
use regex::Regex;

// @module: Scene marker extraction from narration scripts

// @const: Scene marker line regex
static MARKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[SCENE:\s*(.+?)\]\s*$").unwrap()
});

/// A scene marker extracted from a narration script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneMarker {
    // @field: Scene name as written inside the tag
    pub name: String,

    // @field: Byte offset into the cleaned narration text where the scene begins
    pub offset: usize,
}

/// A narration script with its scene markers stripped out
///
/// The clean text is what gets sent to the speech synthesizer; each marker
/// records where in that text its scene begins, in source order. Duplicate
/// marker names are allowed and treated independently.
#[derive(Debug, Clone, Default)]
pub struct ScriptDocument {
    /// Narration text with all marker lines removed, trimmed of surrounding whitespace
    pub clean_text: String,

    /// Markers in source order
    pub markers: Vec<SceneMarker>,
}

impl ScriptDocument {
    /// Parse a raw narration script, removing `[SCENE: name]` lines and
    /// recording where each scene begins in the cleaned text.
    ///
    /// A marker line consists solely of the tag after trimming; it contributes
    /// no characters to the clean text, line terminator included. An empty
    /// script or one without markers is valid and simply yields no markers.
    pub fn parse(raw_text: &str) -> Self {
        let mut markers = Vec::new();
        let mut clean = String::new();

        for line in raw_text.split_inclusive('\n') {
            if let Some(caps) = MARKER_REGEX.captures(line.trim()) {
                markers.push(SceneMarker {
                    name: caps[1].to_string(),
                    offset: clean.len(),
                });
            } else {
                clean.push_str(line);
            }
        }

        // Offsets were recorded against the unstripped text; shift them by the
        // stripped leading byte count so each stays a valid slice position in
        // the text that is actually synthesized.
        let leading = clean.len() - clean.trim_start().len();
        let clean_text = clean.trim().to_string();
        for marker in &mut markers {
            marker.offset = marker
                .offset
                .saturating_sub(leading)
                .min(clean_text.len());
        }

        ScriptDocument { clean_text, markers }
    }

    /// Whether the script contains any scene markers
    pub fn has_markers(&self) -> bool {
        !self.markers.is_empty()
    }
}
