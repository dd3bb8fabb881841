/// Configuration for [`TreeConverter`](super::TreeConverter).
///
/// # Example
///
/// ```
/// use transir_core::convert::ConvertOptions;
///
/// let options = ConvertOptions {
///     max_depth: 64,
///     ..ConvertOptions::default()
/// };
/// assert!(options.keep_spans);
/// ```
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Maximum nesting depth of the external tree; the root is level one.
    ///
    /// Conversion and [`Ast::to_source`](crate::tree::Ast::to_source)
    /// recurse once per level, so this also bounds their stack use.
    ///
    /// Default: 200
    pub max_depth: usize,

    /// Copy each external node's span onto the node built from it.
    ///
    /// Default: true
    pub keep_spans: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            max_depth: 200,
            keep_spans: true,
        }
    }
}
