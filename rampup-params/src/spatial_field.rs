//! Radially resolved fields that may also vary in time.

use ndarray::Array1;
use rampup_core::{
    DEFAULT_INTERPOLATION_MODE, InterpolationMode, Knots, ScalarInput, TimeSeries,
    TimeSeriesError,
    interpolation::{InterpError, Interpolator},
};
use serde::Deserialize;
use thiserror::Error;

use crate::{ConfigError, Grid, ParamsError, sample::sample};

/// Raw configuration input for a spatial field.
///
/// Accepted forms:
/// - a literal, broadcast to every node: `1.5`
/// - a time series, broadcast to every node: `{"0.0": 1.0, "2.0": 3.0}`
/// - node values per time: `{"0.0": [1.0, 2.0, 3.0, 4.0], "1.0": [...]}`
/// - a radial profile per time: `{"0.0": {"0.0": 6.0, "1.0": 0.1}}`
/// - an independent series per node: `{"nodes": [1.0, {"0.0": 1.0, "1.0": 2.0}]}`
///
/// Every time-keyed form may be tagged with an interpolation mode by
/// writing it as `[mapping, "step"]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ProfileInput {
    Constant(f64),
    PerNode { nodes: Vec<ScalarInput> },
    Series(Knots<f64>),
    NodeValues(Knots<Vec<f64>>),
    Radial(Knots<Knots<f64>>),
    SeriesWithMode(Knots<f64>, InterpolationMode),
    NodeValuesWithMode(Knots<Vec<f64>>, InterpolationMode),
    RadialWithMode(Knots<Knots<f64>>, InterpolationMode),
}

impl From<f64> for ProfileInput {
    fn from(value: f64) -> Self {
        ProfileInput::Constant(value)
    }
}

/// Error returned when a spatial field cannot be built from its input.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error(transparent)]
    TimeSeries(#[from] TimeSeriesError),

    #[error("field has no nodes")]
    NoNodes,

    #[error("node values at t = {time} have {actual} entries, expected {expected}")]
    RaggedNodeValues {
        time: f64,
        expected: usize,
        actual: usize,
    },

    #[error("radial profile at t = {time} is invalid: {reason}")]
    RadialProfile { time: f64, reason: &'static str },

    #[error(transparent)]
    Interpolation(#[from] InterpError),
}

/// A quantity defined on the radial grid, possibly varying in time.
///
/// A field is authored in one of three layouts:
/// - a single [`TimeSeries`] broadcast to every node,
/// - one independent [`TimeSeries`] per node,
/// - a radial profile per time knot, projected onto the nodes when a grid
///   is attached.
///
/// The field must be bound to a [`Grid`] with [`SpatialField::set_grid`]
/// before it can be evaluated.
///
/// The edge value (used when a boundary condition falls back to the field)
/// is the field at `rho = 1` for radial profiles, the broadcast value for
/// broadcast fields, and the last node for per-node fields.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialField {
    layout: Layout,
    bound: Option<Bound>,
}

#[derive(Debug, Clone, PartialEq)]
enum Layout {
    Broadcast(TimeSeries),
    PerNode(Vec<TimeSeries>),
    Radial {
        profiles: Vec<(f64, Interpolator)>,
        mode: InterpolationMode,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct Bound {
    nodes: NodeSeries,
    edge: TimeSeries,
}

#[derive(Debug, Clone, PartialEq)]
enum NodeSeries {
    Broadcast { series: TimeSeries, len: usize },
    PerNode(Vec<TimeSeries>),
}

impl SpatialField {
    /// Creates a field with the same series at every node.
    #[must_use]
    pub fn broadcast(series: TimeSeries) -> Self {
        Self::unbound(Layout::Broadcast(series))
    }

    /// Creates a field with an independent series per node, in node order.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::NoNodes`] if `nodes` is empty.
    pub fn per_node(nodes: Vec<TimeSeries>) -> Result<Self, ProfileError> {
        if nodes.is_empty() {
            return Err(ProfileError::NoNodes);
        }
        Ok(Self::unbound(Layout::PerNode(nodes)))
    }

    /// Creates a field from node values given per time knot.
    ///
    /// Each node is interpolated in time independently.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no knots, no nodes, or the vectors differ
    /// in length, or if any node's series is malformed.
    pub fn from_node_values<I>(knots: I, mode: InterpolationMode) -> Result<Self, ProfileError>
    where
        I: IntoIterator<Item = (f64, Vec<f64>)>,
    {
        let knots: Vec<(f64, Vec<f64>)> = knots.into_iter().collect();
        let width = knots
            .first()
            .map(|(_, values)| values.len())
            .ok_or(TimeSeriesError::Empty)?;

        if width == 0 {
            return Err(ProfileError::NoNodes);
        }
        if let Some((time, values)) = knots.iter().find(|(_, values)| values.len() != width) {
            return Err(ProfileError::RaggedNodeValues {
                time: *time,
                expected: width,
                actual: values.len(),
            });
        }

        let nodes = (0..width)
            .map(|i| TimeSeries::new(knots.iter().map(|(t, values)| (*t, values[i])), mode))
            .collect::<Result<Vec<_>, _>>()?;

        Self::per_node(nodes)
    }

    /// Creates a field from radial profiles given per time knot.
    ///
    /// Each profile maps normalized radius to value and is interpolated
    /// linearly in radius (clamped at its ends); the resulting node values are
    /// interpolated in time using `mode`.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no knots, if knot times are not finite
    /// and strictly increasing, or if any profile is empty or has radii that
    /// are not finite and strictly increasing.
    pub fn from_radial_profiles<I, P>(knots: I, mode: InterpolationMode) -> Result<Self, ProfileError>
    where
        I: IntoIterator<Item = (f64, P)>,
        P: IntoIterator<Item = (f64, f64)>,
    {
        let mut profiles = Vec::new();
        for (time, profile) in knots {
            profiles.push((time, radial_profile(time, profile)?));
        }

        let times: Vec<f64> = profiles.iter().map(|(t, _)| *t).collect();
        check_times(&times)?;

        Ok(Self::unbound(Layout::Radial { profiles, mode }))
    }

    fn unbound(layout: Layout) -> Self {
        Self {
            layout,
            bound: None,
        }
    }

    /// Binds the field to `grid`, replacing any previous binding.
    ///
    /// Radial profiles are projected onto the grid nodes and the edge here,
    /// so evaluation afterwards only interpolates in time.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a per-node field has a different number of
    /// nodes than `grid`, or if a projected series is malformed.
    pub fn set_grid(&mut self, grid: &Grid, field: &'static str) -> Result<(), ConfigError> {
        let bound = match &self.layout {
            Layout::Broadcast(series) => Bound {
                nodes: NodeSeries::Broadcast {
                    series: series.clone(),
                    len: grid.len(),
                },
                edge: series.clone(),
            },
            Layout::PerNode(nodes) => {
                if nodes.len() != grid.len() {
                    return Err(ConfigError::NodeCountMismatch {
                        field,
                        expected: grid.len(),
                        actual: nodes.len(),
                    });
                }
                let edge = nodes
                    .last()
                    .cloned()
                    .ok_or(ConfigError::Profile {
                        field,
                        source: ProfileError::NoNodes,
                    })?;
                Bound {
                    nodes: NodeSeries::PerNode(nodes.clone()),
                    edge,
                }
            }
            Layout::Radial { profiles, mode } => {
                let project = |rho: f64| {
                    project_radial(profiles, *mode, rho)
                        .map_err(|source| ConfigError::Profile { field, source })
                };
                Bound {
                    nodes: NodeSeries::PerNode(
                        grid.nodes()
                            .iter()
                            .map(|&rho| project(rho))
                            .collect::<Result<_, _>>()?,
                    ),
                    edge: project(Grid::EDGE)?,
                }
            }
        };

        self.bound = Some(bound);
        Ok(())
    }

    /// Returns `true` if a grid has been attached.
    #[must_use]
    pub fn has_grid(&self) -> bool {
        self.bound.is_some()
    }

    /// Evaluates the field at every grid node at time `t`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingGrid`] if no grid is attached, or an
    /// interpolation error if `t` cannot be evaluated.
    pub fn value_at(&self, t: f64, field: &'static str) -> Result<Array1<f64>, ParamsError> {
        match &self.bound(field)?.nodes {
            NodeSeries::Broadcast { series, len } => {
                Ok(Array1::from_elem(*len, sample(series, field, t)?))
            }
            NodeSeries::PerNode(nodes) => nodes
                .iter()
                .map(|series| sample(series, field, t))
                .collect::<Result<Vec<_>, _>>()
                .map(Array1::from),
        }
    }

    /// Evaluates the field at the domain edge at time `t`.
    ///
    /// # Errors
    ///
    /// Same as [`SpatialField::value_at`].
    pub fn edge_value_at(&self, t: f64, field: &'static str) -> Result<f64, ParamsError> {
        sample(&self.bound(field)?.edge, field, t)
    }

    fn bound(&self, field: &'static str) -> Result<&Bound, ConfigError> {
        self.bound
            .as_ref()
            .ok_or(ConfigError::MissingGrid { field })
    }
}

impl TryFrom<ProfileInput> for SpatialField {
    type Error = ProfileError;

    fn try_from(input: ProfileInput) -> Result<Self, Self::Error> {
        let mode = DEFAULT_INTERPOLATION_MODE;
        match input {
            ProfileInput::Constant(value) => Ok(Self::broadcast(TimeSeries::constant(value)?)),
            ProfileInput::PerNode { nodes } => Self::per_node(
                nodes
                    .into_iter()
                    .map(TimeSeries::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            ProfileInput::Series(knots) => Ok(Self::broadcast(TimeSeries::new(knots, mode)?)),
            ProfileInput::SeriesWithMode(knots, mode) => {
                Ok(Self::broadcast(TimeSeries::new(knots, mode)?))
            }
            ProfileInput::NodeValues(knots) => Self::from_node_values(knots, mode),
            ProfileInput::NodeValuesWithMode(knots, mode) => Self::from_node_values(knots, mode),
            ProfileInput::Radial(knots) => Self::from_radial_profiles(knots, mode),
            ProfileInput::RadialWithMode(knots, mode) => Self::from_radial_profiles(knots, mode),
        }
    }
}

fn check_times(times: &[f64]) -> Result<(), TimeSeriesError> {
    if times.is_empty() {
        return Err(TimeSeriesError::Empty);
    }
    if let Some(&time) = times.iter().find(|t| !t.is_finite()) {
        return Err(TimeSeriesError::NonFiniteTime { time });
    }
    if let Some(pair) = times.windows(2).find(|pair| pair[0] >= pair[1]) {
        return Err(TimeSeriesError::NonIncreasing {
            previous: pair[0],
            next: pair[1],
        });
    }
    Ok(())
}

fn radial_profile<P>(time: f64, profile: P) -> Result<Interpolator, ProfileError>
where
    P: IntoIterator<Item = (f64, f64)>,
{
    let (radii, values): (Vec<f64>, Vec<f64>) = profile.into_iter().unzip();

    if radii.is_empty() {
        return Err(ProfileError::RadialProfile {
            time,
            reason: "profile has no points",
        });
    }
    if radii.iter().chain(&values).any(|x| !x.is_finite()) {
        return Err(ProfileError::RadialProfile {
            time,
            reason: "radii and values must be finite",
        });
    }
    if radii.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(ProfileError::RadialProfile {
            time,
            reason: "radii must be strictly increasing",
        });
    }

    Ok(Interpolator::new(radii, values, InterpolationMode::Linear)?)
}

fn project_radial(
    profiles: &[(f64, Interpolator)],
    mode: InterpolationMode,
    rho: f64,
) -> Result<TimeSeries, ProfileError> {
    let knots = profiles
        .iter()
        .map(|(t, profile)| Ok((*t, profile.evaluate(rho)?)))
        .collect::<Result<Vec<_>, InterpError>>()?;
    Ok(TimeSeries::new(knots, mode)?)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn assert_all_close(actual: &Array1<f64>, expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "length mismatch: {actual}");
        for (a, e) in actual.iter().zip(expected) {
            assert_relative_eq!(*a, *e, max_relative = 1e-12);
        }
    }

    #[test]
    fn broadcast_field_replicates_the_scalar() {
        let mut field = SpatialField::broadcast(
            TimeSeries::from_knots([(0.0, 1.0), (2.0, 3.0)]).unwrap(),
        );
        field.set_grid(&Grid::uniform(3).unwrap(), "x").unwrap();

        assert_all_close(&field.value_at(1.0, "x").unwrap(), &[2.0, 2.0, 2.0]);
        assert_relative_eq!(field.edge_value_at(1.0, "x").unwrap(), 2.0);
    }

    #[test]
    fn node_values_interpolate_elementwise() {
        let mut field = SpatialField::from_node_values(
            [
                (0.0, vec![1.0, 2.0, 3.0, 4.0]),
                (1.0, vec![3.0, 6.0, 9.0, 12.0]),
            ],
            InterpolationMode::Linear,
        )
        .unwrap();
        field.set_grid(&Grid::uniform(4).unwrap(), "x").unwrap();

        assert_all_close(&field.value_at(0.5, "x").unwrap(), &[2.0, 4.0, 6.0, 8.0]);
        assert_relative_eq!(field.edge_value_at(0.5, "x").unwrap(), 8.0);
    }

    #[test]
    fn radial_profiles_are_projected_onto_the_grid() {
        let mut field = SpatialField::from_radial_profiles(
            [(0.0, vec![(0.0, 1.0), (1.0, 2.0)])],
            InterpolationMode::Linear,
        )
        .unwrap();
        field.set_grid(&Grid::uniform(4).unwrap(), "T_i").unwrap();

        assert_all_close(
            &field.value_at(0.0, "T_i").unwrap(),
            &[1.125, 1.375, 1.625, 1.875],
        );
        assert_relative_eq!(field.edge_value_at(0.0, "T_i").unwrap(), 2.0);
    }

    #[test]
    fn radial_profiles_interpolate_in_time() {
        let mut field = SpatialField::from_radial_profiles(
            [
                (0.0, vec![(0.0, 0.0), (1.0, 0.0)]),
                (2.0, vec![(0.0, 4.0), (1.0, 2.0)]),
            ],
            InterpolationMode::Linear,
        )
        .unwrap();
        field.set_grid(&Grid::from_nodes(vec![0.0, 0.5]).unwrap(), "x").unwrap();

        assert_all_close(&field.value_at(1.0, "x").unwrap(), &[2.0, 1.5]);
        assert_relative_eq!(field.edge_value_at(1.0, "x").unwrap(), 1.0);
    }

    #[test]
    fn per_node_field_must_match_the_grid() {
        let mut field = SpatialField::per_node(vec![
            TimeSeries::constant(1.0).unwrap(),
            TimeSeries::constant(2.0).unwrap(),
        ])
        .unwrap();

        let err = field.set_grid(&Grid::uniform(3).unwrap(), "x").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NodeCountMismatch {
                expected: 3,
                actual: 2,
                ..
            }
        ));
        assert!(!field.has_grid());
    }

    #[test]
    fn evaluating_without_a_grid_fails() {
        let field = SpatialField::broadcast(TimeSeries::constant(1.0).unwrap());
        let err = field.value_at(0.0, "T_e").unwrap_err();
        assert!(matches!(
            err,
            ParamsError::Config(ConfigError::MissingGrid { field: "T_e" })
        ));
    }

    #[test]
    fn ragged_node_values_are_rejected() {
        let result = SpatialField::from_node_values(
            [(0.0, vec![1.0, 2.0]), (1.0, vec![1.0])],
            InterpolationMode::Linear,
        );
        assert!(matches!(
            result,
            Err(ProfileError::RaggedNodeValues {
                expected: 2,
                actual: 1,
                ..
            })
        ));
    }

    #[test]
    fn every_input_form_deserializes() {
        let grid = Grid::uniform(2).unwrap();
        let cases = [
            ("2.0", vec![2.0, 2.0]),
            (r#"{"0.0": 2.0, "2.0": 4.0}"#, vec![3.0, 3.0]),
            (r#"{"0.0": [1.0, 2.0], "2.0": [3.0, 4.0]}"#, vec![2.0, 3.0]),
            (r#"{"0.0": {"0.0": 0.0, "1.0": 4.0}}"#, vec![1.0, 3.0]),
            (r#"[{"0.0": 2.0, "2.0": 4.0}, "step"]"#, vec![2.0, 2.0]),
            (r#"{"nodes": [5.0, {"0.0": 0.0, "2.0": 2.0}]}"#, vec![5.0, 1.0]),
        ];

        for (json, expected) in cases {
            let input: ProfileInput = serde_json::from_str(json).unwrap();
            let mut field = SpatialField::try_from(input).unwrap();
            field.set_grid(&grid, "x").unwrap();
            assert_all_close(&field.value_at(1.0, "x").unwrap(), &expected);
        }
    }
}
