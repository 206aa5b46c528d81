/// The core trait for anything evaluated at a query input.
///
/// A `Component` takes an input and produces an output. In rampup the input
/// is almost always a simulation time, and the output is the value of a
/// time-dependent parameter, or an entire parameter snapshot, at that time.
///
/// ## Implementing `Component`
///
/// Implement the [`call()`] method, which takes an input and returns either an
/// output or an error. Components must be deterministic, always producing the
/// same result for a given input, and must not mutate shared state.
/// Callers rely on this to evaluate the same component from several threads
/// and to compare results across calls.
///
/// [`call()`]: Component::call
pub trait Component {
    type Input;
    type Output;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Calls the component with the given input and returns a result.
    ///
    /// This is the only method required when implementing `Component`.
    ///
    /// # Errors
    ///
    /// Each component defines its own `Error` type, allowing it to determine
    /// what constitutes a failure within its domain.
    fn call(&self, input: Self::Input) -> Result<Self::Output, Self::Error>;
}
