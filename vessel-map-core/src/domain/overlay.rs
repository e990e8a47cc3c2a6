use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter};

/// Named source on the map. Each holds at most one geometry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Overlay {
    Destination,
    Vessel,
    Route,
}

/// Rendering layer bound to an overlay source, in the map style format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    pub id: Overlay,
    pub source: Overlay,
    #[serde(flatten)]
    pub kind: LayerKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LayerKind {
    Symbol { layout: SymbolLayout },
    Line { paint: LinePaint },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SymbolLayout {
    pub icon_image: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LinePaint {
    pub line_width: f64,
    pub line_color: &'static str,
}

impl Overlay {
    pub fn layer(self) -> Layer {
        let kind = match self {
            Overlay::Destination => LayerKind::Symbol {
                layout: SymbolLayout {
                    icon_image: "harbor-15",
                },
            },
            Overlay::Vessel => LayerKind::Symbol {
                layout: SymbolLayout {
                    icon_image: "ferry-15",
                },
            },
            Overlay::Route => LayerKind::Line {
                paint: LinePaint {
                    line_width: 3.0,
                    line_color: "blue",
                },
            },
        };

        Layer {
            id: self,
            source: self,
            kind,
        }
    }
}
