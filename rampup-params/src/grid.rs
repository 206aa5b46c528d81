use ndarray::Array1;

use crate::ConfigError;

/// The radial computational grid that spatial fields are evaluated on.
///
/// Holds the ordered, normalized node positions (`0 ≤ rho ≤ 1`) supplied by
/// the mesh builder. The domain edge is always at `rho = 1`, which is where
/// boundary conditions apply.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    nodes: Array1<f64>,
}

impl Grid {
    /// Position of the domain edge in normalized radius.
    pub const EDGE: f64 = 1.0;

    /// Creates a uniform grid of `n` cells, with nodes at the cell centres.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidGrid`] if `n` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use rampup_params::Grid;
    ///
    /// let grid = Grid::uniform(4).unwrap();
    /// assert_eq!(grid.nodes().to_vec(), vec![0.125, 0.375, 0.625, 0.875]);
    /// ```
    pub fn uniform(n: usize) -> Result<Self, ConfigError> {
        if n == 0 {
            return Err(ConfigError::InvalidGrid {
                reason: "a grid needs at least one cell",
            });
        }
        #[allow(clippy::cast_precision_loss)]
        let dx = 1.0 / n as f64;
        Ok(Self {
            nodes: Array1::from_shape_fn(n, |i| {
                #[allow(clippy::cast_precision_loss)]
                let i = i as f64;
                (i + 0.5) * dx
            }),
        })
    }

    /// Creates a grid from explicit node positions.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidGrid`] if there are no nodes, or if the
    /// positions are not finite, strictly increasing, and within `[0, 1]`.
    pub fn from_nodes(nodes: impl Into<Vec<f64>>) -> Result<Self, ConfigError> {
        let nodes: Vec<f64> = nodes.into();

        if nodes.is_empty() {
            return Err(ConfigError::InvalidGrid {
                reason: "a grid needs at least one node",
            });
        }
        if nodes.iter().any(|x| !(0.0..=Self::EDGE).contains(x)) {
            return Err(ConfigError::InvalidGrid {
                reason: "node positions must lie within [0, 1]",
            });
        }
        if nodes.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(ConfigError::InvalidGrid {
                reason: "node positions must be strictly increasing",
            });
        }

        Ok(Self {
            nodes: Array1::from(nodes),
        })
    }

    /// Returns the node positions.
    #[must_use]
    pub fn nodes(&self) -> &Array1<f64> {
        &self.nodes
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`; a grid has at least one node.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn uniform_grid_uses_cell_centres() {
        let grid = Grid::uniform(5).unwrap();
        assert_eq!(grid.len(), 5);
        assert_relative_eq!(grid.nodes()[0], 0.1);
        assert_relative_eq!(grid.nodes()[4], 0.9);
    }

    #[test]
    fn invalid_grids_are_rejected() {
        assert!(Grid::uniform(0).is_err());
        assert!(Grid::from_nodes(Vec::<f64>::new()).is_err());
        assert!(Grid::from_nodes(vec![0.5, 0.25]).is_err());
        assert!(Grid::from_nodes(vec![0.5, 0.5]).is_err());
        assert!(Grid::from_nodes(vec![0.5, 1.5]).is_err());
        assert!(Grid::from_nodes(vec![f64::NAN]).is_err());
    }

    #[test]
    fn explicit_nodes_are_kept() {
        let grid = Grid::from_nodes(vec![0.0, 0.3, 1.0]).unwrap();
        assert_eq!(grid.nodes().to_vec(), vec![0.0, 0.3, 1.0]);
    }
}
