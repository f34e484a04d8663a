//! Where the status line is anchored.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    #[default]
    Right,
}

impl Alignment {
    /// Map the `alignLeft` setting onto an alignment
    pub fn from_align_left(align_left: bool) -> Self {
        if align_left {
            Alignment::Left
        } else {
            Alignment::Right
        }
    }
}
