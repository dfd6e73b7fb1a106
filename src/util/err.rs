/// Converts errors from their error type (of the submodule) to that of
/// a `footfall::Error` variant, or to a variant of a submodule error.
///
/// ```rust,ignore
/// use footfall::graph::GraphError;
/// footfall::impl_err!(GraphError, Graph);
/// footfall::impl_err!(csv::Error, GraphError, Csv);
/// ```
pub mod err_macro {
    #[macro_export]
    macro_rules! impl_err {
        ($from:ty, $variant:ident) => {
            impl From<$from> for $crate::Error {
                fn from(value: $from) -> Self {
                    $crate::Error::$variant(value)
                }
            }
        };
        ($from:ty, $to:ident, $variant:ident) => {
            impl From<$from> for $to {
                fn from(value: $from) -> Self {
                    $to::$variant(value)
                }
            }
        };
    }

    pub use impl_err;
}
