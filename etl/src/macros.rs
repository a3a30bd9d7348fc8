//! Shorthands for building [`crate::error::EtlError`] values.

/// Builds an [`crate::error::EtlError`] from a kind and a static description.
///
/// A third argument adds detail: `detail = value` moves anything convertible into a
/// `Cow<'static, str>`, a bare expression is rendered with `to_string`. A trailing
/// `source: err` attaches the underlying error.
///
/// ```ignore
/// etl_error!(ErrorKind::ParseError, "Unrecognized date format", raw_date);
/// etl_error!(ErrorKind::PersistenceFailed, "Upsert failed", detail = message, source: err);
/// ```
#[macro_export]
macro_rules! etl_error {
    ($kind:expr, $desc:expr) => {
        $crate::error::EtlError::from(($kind, $desc))
    };
    ($kind:expr, $desc:expr, source: $source:expr) => {
        $crate::etl_error!($kind, $desc).with_source($source)
    };
    ($kind:expr, $desc:expr, detail = $detail:expr) => {
        $crate::error::EtlError::from(($kind, $desc, $detail))
    };
    ($kind:expr, $desc:expr, detail = $detail:expr, source: $source:expr) => {
        $crate::etl_error!($kind, $desc, detail = $detail).with_source($source)
    };
    ($kind:expr, $desc:expr, $detail:expr) => {
        $crate::etl_error!($kind, $desc, detail = $detail.to_string())
    };
    ($kind:expr, $desc:expr, $detail:expr, source: $source:expr) => {
        $crate::etl_error!($kind, $desc, detail = $detail.to_string(), source: $source)
    };
}

/// Returns early with an [`crate::error::EtlError`] built by [`etl_error!`].
///
/// Accepts exactly the arguments of [`etl_error!`].
#[macro_export]
macro_rules! bail {
    ($($args:tt)+) => {
        return ::core::result::Result::Err($crate::etl_error!($($args)+))
    };
}
