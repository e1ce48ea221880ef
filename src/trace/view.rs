//! Display projection of producer states
//!
//! Every producer state can be flattened into a [`Grid`]: labelled rows of
//! text cells, each optionally tagged with the [`EntityId`] it represents.
//! The terminal UI renders any algorithm through this single shape and
//! emphasises cells (or whole rows) whose id appears in a step's highlight set.

use super::EntityId;

/// A single rendered value
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GridCell {
    pub text: String,
    pub id: Option<EntityId>,
}

impl GridCell {
    pub fn new(text: impl Into<String>, id: Option<EntityId>) -> Self {
        GridCell {
            text: text.into(),
            id,
        }
    }

    /// A cell tagged with an entity id
    pub fn entity(text: impl Into<String>, id: EntityId) -> Self {
        Self::new(text, Some(id))
    }

    /// A cell with no entity behind it
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, None)
    }
}

/// A labelled row; `id` lets a whole row (a bucket, a chain) be highlighted
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GridRow {
    pub label: String,
    pub id: Option<EntityId>,
    pub cells: Vec<GridCell>,
}

impl GridRow {
    pub fn new(label: impl Into<String>, cells: Vec<GridCell>) -> Self {
        GridRow {
            label: label.into(),
            id: None,
            cells,
        }
    }

    /// Tag the row with an entity id
    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }

    /// A row of values whose ids are their positions
    pub fn indexed<T: ToString>(label: impl Into<String>, values: &[T]) -> Self {
        let cells = values
            .iter()
            .enumerate()
            .map(|(i, v)| GridCell::entity(v.to_string(), i))
            .collect();
        GridRow::new(label, cells)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Grid {
    pub rows: Vec<GridRow>,
}

impl Grid {
    pub fn new(rows: Vec<GridRow>) -> Self {
        Grid { rows }
    }

    /// Plain-text rendering used by `--print` and in tests
    pub fn to_text(&self) -> String {
        let width = self
            .rows
            .iter()
            .map(|row| row.label.chars().count())
            .max()
            .unwrap_or(0);
        self.rows
            .iter()
            .map(|row| {
                let cells: Vec<&str> = row.cells.iter().map(|c| c.text.as_str()).collect();
                format!("{:>width$} | {}", row.label, cells.join(" "), width = width)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Projection from a producer's working state to a displayable grid
pub trait StateView {
    fn grid(&self) -> Grid;
}

/// Format an optional value, using `∞`/`-` style placeholders
pub fn or_placeholder<T: ToString>(value: Option<T>, placeholder: &str) -> String {
    value.map_or_else(|| placeholder.to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexed_row_uses_positions_as_ids() {
        let row = GridRow::indexed("a", &[7, 8, 9]);
        assert_eq!(row.cells[2].id, Some(2));
        assert_eq!(row.cells[2].text, "9");
    }

    #[test]
    fn text_rendering_aligns_labels() {
        let grid = Grid::new(vec![
            GridRow::indexed("parent", &[0, 0]),
            GridRow::indexed("rank", &[1, 0]),
        ]);
        assert_eq!(grid.to_text(), "parent | 0 0\n  rank | 1 0");
    }
}
