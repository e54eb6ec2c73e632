use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use grid_breakout_core::{Coordinate, Grid};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const LAYOUT_DOMAIN: &str = "breakout";
const LAYOUT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded layout payload.
pub(crate) const LAYOUT_HEADER: &str = "breakout:v1";

/// Block cells bound to the dimensions of the grid they were laid out on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BlockLayout {
    /// Number of columns of the source grid.
    pub width: u32,
    /// Number of rows of the source grid.
    pub height: u32,
    /// Block cells composing the layout.
    pub blocks: Vec<Coordinate>,
}

#[derive(Serialize, Deserialize)]
struct Payload {
    blocks: Vec<Coordinate>,
}

impl BlockLayout {
    /// Captures the cells laid out on `grid`.
    pub(crate) fn for_grid(grid: &Grid, blocks: Vec<Coordinate>) -> Self {
        Self {
            width: grid.width(),
            height: grid.height(),
            blocks,
        }
    }

    /// Renders the layout as `breakout:v1:<W>x<H>:<base64 json>`.
    pub(crate) fn encode(&self) -> Result<String, LayoutTransferError> {
        let json = serde_json::to_vec(&Payload {
            blocks: self.blocks.clone(),
        })
        .map_err(LayoutTransferError::Payload)?;
        Ok(format!(
            "{LAYOUT_HEADER}:{}x{}:{}",
            self.width,
            self.height,
            STANDARD_NO_PAD.encode(json)
        ))
    }

    /// Parses a layout string produced by [`BlockLayout::encode`].
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(LayoutTransferError::Empty);
        }

        let fields: Vec<&str> = value.splitn(4, ':').collect();
        let [domain, version, dimensions, payload] = fields[..] else {
            return Err(LayoutTransferError::Truncated {
                fields: fields.len(),
            });
        };
        if domain != LAYOUT_DOMAIN {
            return Err(LayoutTransferError::ForeignDomain(domain.to_owned()));
        }
        if version != LAYOUT_VERSION {
            return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
        }

        let (width, height) = parse_dimensions(dimensions)
            .ok_or_else(|| LayoutTransferError::Dimensions(dimensions.to_owned()))?;
        let json = STANDARD_NO_PAD
            .decode(payload)
            .map_err(LayoutTransferError::Encoding)?;
        let Payload { blocks } =
            serde_json::from_slice(&json).map_err(LayoutTransferError::Payload)?;

        Ok(Self {
            width,
            height,
            blocks,
        })
    }

    /// Checks the layout against `grid` and yields its cells.
    ///
    /// Rejects layouts authored for different dimensions and cells outside
    /// the grid. Paddle-row cells are left for the world to reject.
    pub(crate) fn into_cells_for(
        self,
        grid: &Grid,
    ) -> Result<Vec<Coordinate>, LayoutTransferError> {
        if (self.width, self.height) != (grid.width(), grid.height()) {
            return Err(LayoutTransferError::GridMismatch {
                layout_width: self.width,
                layout_height: self.height,
                grid_width: grid.width(),
                grid_height: grid.height(),
            });
        }
        if let Some(&cell) = self.blocks.iter().find(|cell| !grid.is_inside(**cell)) {
            return Err(LayoutTransferError::CellOutsideGrid(cell));
        }
        Ok(self.blocks)
    }
}

/// Failures while encoding, decoding or applying a layout string.
#[derive(Debug, Error)]
pub(crate) enum LayoutTransferError {
    /// The string was empty or whitespace.
    #[error("layout string was empty")]
    Empty,
    /// Fewer than the four `domain:version:dimensions:payload` fields.
    #[error("layout string has {fields} of 4 fields")]
    Truncated {
        /// Number of fields present.
        fields: usize,
    },
    /// The string belongs to another format.
    #[error("layout domain '{0}' is not supported")]
    ForeignDomain(String),
    /// The format version is unknown.
    #[error("layout version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// Dimensions were malformed or zero.
    #[error("could not parse grid dimensions '{0}'")]
    Dimensions(String),
    /// The payload was not valid base64.
    #[error("could not decode layout payload: {0}")]
    Encoding(#[source] base64::DecodeError),
    /// The payload JSON could not be produced or read.
    #[error("could not process layout payload: {0}")]
    Payload(#[source] serde_json::Error),
    /// The layout was authored for another grid size.
    #[error(
        "block layout targets a {layout_width}x{layout_height} grid \
         but the game uses {grid_width}x{grid_height}"
    )]
    GridMismatch {
        /// Columns the layout was authored for.
        layout_width: u32,
        /// Rows the layout was authored for.
        layout_height: u32,
        /// Columns of the configured grid.
        grid_width: u32,
        /// Rows of the configured grid.
        grid_height: u32,
    },
    /// A block cell lies outside the grid.
    #[error("block at {0:?} lies outside the grid")]
    CellOutsideGrid(Coordinate),
}

fn parse_dimensions(dimensions: &str) -> Option<(u32, u32)> {
    let (width, height) = dimensions.split_once(['x', 'X'])?;
    let width = width.trim().parse::<u32>().ok()?;
    let height = height.trim().parse::<u32>().ok()?;
    (width > 0 && height > 0).then_some((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> BlockLayout {
        BlockLayout::for_grid(
            &Grid::new(20, 15, 1),
            vec![Coordinate::new(5, 7), Coordinate::new(12, 4)],
        )
    }

    #[test]
    fn encoded_layout_decodes_unchanged() {
        let encoded = layout().encode().expect("layout encodes");
        assert!(encoded.starts_with(&format!("{LAYOUT_HEADER}:20x15:")));

        let decoded = BlockLayout::decode(&encoded).expect("layout decodes");
        assert_eq!(decoded, layout());
    }

    #[test]
    fn rejects_foreign_domain() {
        let error = BlockLayout::decode("arena:v1:4x4:e30").expect_err("domain rejected");
        assert!(matches!(error, LayoutTransferError::ForeignDomain(domain) if domain == "arena"));
    }

    #[test]
    fn rejects_zero_sized_grid() {
        let error = BlockLayout::decode("breakout:v1:0x4:e30").expect_err("dimensions rejected");
        assert!(matches!(error, LayoutTransferError::Dimensions(_)));
    }

    #[test]
    fn rejects_truncated_string() {
        let error = BlockLayout::decode("breakout:v1:4x4").expect_err("payload required");
        assert!(matches!(error, LayoutTransferError::Truncated { fields: 3 }));
    }

    #[test]
    fn matching_grid_yields_cells() {
        let cells = layout()
            .into_cells_for(&Grid::new(20, 15, 1))
            .expect("dimensions match");
        assert_eq!(cells, vec![Coordinate::new(5, 7), Coordinate::new(12, 4)]);
    }

    #[test]
    fn rejects_layout_for_another_grid() {
        let error = layout()
            .into_cells_for(&Grid::new(10, 15, 1))
            .expect_err("width differs");
        assert!(matches!(
            error,
            LayoutTransferError::GridMismatch {
                layout_width: 20,
                grid_width: 10,
                ..
            }
        ));
    }

    #[test]
    fn rejects_cells_outside_the_grid() {
        let grid = Grid::new(6, 6, 1);
        let stray = BlockLayout::for_grid(
            &grid,
            vec![Coordinate::new(2, 3), Coordinate::new(6, 3)],
        );

        let error = stray.into_cells_for(&grid).expect_err("cell out of bounds");
        assert!(matches!(
            error,
            LayoutTransferError::CellOutsideGrid(cell) if cell == Coordinate::new(6, 3)
        ));
    }
}
