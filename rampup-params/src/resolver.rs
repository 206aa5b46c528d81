//! Cross-field defaulting within a configuration section.
//!
//! Some fields may be left unset and fall back to a sibling: a boundary
//! condition without a value takes the edge value of its profile, and takes
//! the profile's representation flag with it. [`FieldResolver`] resolves
//! these relations as a small dependency pass, once, when the section is
//! built. Fields that carry their own value are resolved first; fields that
//! fall back are resolved as soon as the sibling they depend on is.

use std::collections::BTreeMap;

use tracing::trace;

use crate::ConfigError;

/// Declares one field taking part in resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub has_value: bool,
    pub flag: Option<bool>,
    pub fallback: Option<&'static str>,
}

impl FieldSpec {
    /// A field that always carries its own value.
    #[must_use]
    pub fn value(name: &'static str, flag: Option<bool>) -> Self {
        Self {
            name,
            has_value: true,
            flag,
            fallback: None,
        }
    }

    /// A field that falls back to `sibling` when `has_value` is `false`.
    #[must_use]
    pub fn with_fallback(
        name: &'static str,
        has_value: bool,
        flag: Option<bool>,
        sibling: &'static str,
    ) -> Self {
        Self {
            name,
            has_value,
            flag,
            fallback: Some(sibling),
        }
    }
}

/// Where a resolved field takes its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// The field's own, explicitly configured value.
    Explicit,
    /// The value of another field, named here.
    Inherited { from: &'static str },
}

/// The outcome of resolving one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub flag: bool,
    pub origin: Origin,
}

impl Resolution {
    /// Returns `true` if the field has its own value rather than a fallback.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.origin == Origin::Explicit
    }

    /// The field whose value this one ultimately uses.
    fn source(&self, own_name: &'static str) -> &'static str {
        match self.origin {
            Origin::Explicit => own_name,
            Origin::Inherited { from } => from,
        }
    }
}

/// Resolved fields of one section, by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolutions(BTreeMap<&'static str, Resolution>);

impl Resolutions {
    /// Returns the resolution of `field`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnresolvedDependency`] if `field` was never declared.
    pub fn get(&self, field: &'static str) -> Result<Resolution, ConfigError> {
        self.0
            .get(field)
            .copied()
            .ok_or(ConfigError::UnresolvedDependency {
                field,
                depends_on: field,
            })
    }
}

/// Resolves fallbacks between the fields of one section.
///
/// # Examples
///
/// ```
/// use rampup_params::resolver::{FieldResolver, FieldSpec, Origin};
///
/// let resolutions = FieldResolver::new()
///     .with(FieldSpec::value("n_e", Some(true)))
///     .with(FieldSpec::with_fallback("n_e_right_bc", false, Some(false), "n_e"))
///     .resolve()
///     .unwrap();
///
/// let bc = resolutions.get("n_e_right_bc").unwrap();
/// assert!(bc.flag);
/// assert_eq!(bc.origin, Origin::Inherited { from: "n_e" });
/// assert!(!bc.is_absolute());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FieldResolver {
    specs: Vec<FieldSpec>,
}

impl FieldResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field.
    #[must_use]
    pub fn with(mut self, spec: FieldSpec) -> Self {
        self.specs.push(spec);
        self
    }

    /// Resolves every declared field.
    ///
    /// A field with its own value keeps its own flag, defaulting to `false`.
    /// A field without a value inherits both the value source and the flag
    /// of its fallback sibling, following chains of fallbacks.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::DuplicateField`] if a name is declared twice.
    /// - [`ConfigError::UnresolvedDependency`] if a field without a value has
    ///   no fallback, falls back to an undeclared field, or is part of a cycle.
    pub fn resolve(&self) -> Result<Resolutions, ConfigError> {
        let mut resolved = BTreeMap::new();

        for spec in &self.specs {
            if self.specs.iter().filter(|s| s.name == spec.name).count() > 1 {
                return Err(ConfigError::DuplicateField { field: spec.name });
            }
        }

        for spec in self.specs.iter().filter(|s| s.has_value) {
            resolved.insert(
                spec.name,
                Resolution {
                    flag: spec.flag.unwrap_or(false),
                    origin: Origin::Explicit,
                },
            );
        }

        let mut pending: Vec<&FieldSpec> = self.specs.iter().filter(|s| !s.has_value).collect();
        while !pending.is_empty() {
            let remaining = pending.len();

            pending.retain(|spec| {
                let Some((sibling, parent)) = spec
                    .fallback
                    .and_then(|sibling| resolved.get(sibling).map(|r| (sibling, *r)))
                else {
                    return true;
                };
                let resolution = Resolution {
                    flag: parent.flag,
                    origin: Origin::Inherited {
                        from: parent.source(sibling),
                    },
                };
                trace!(field = spec.name, from = sibling, "field falls back to sibling");
                resolved.insert(spec.name, resolution);
                false
            });

            if pending.len() == remaining {
                let spec = pending[0];
                return Err(ConfigError::UnresolvedDependency {
                    field: spec.name,
                    depends_on: spec.fallback.unwrap_or("<no fallback>"),
                });
            }
        }

        Ok(Resolutions(resolved))
    }
}
