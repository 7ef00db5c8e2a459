//! Default value functions for serde deserialization.
//!
//! These functions forward to constants defined in `v2stat_core::defaults`.

use v2stat_core::defaults;

/// Generate default value functions that forward to v2stat_core::defaults constants.
macro_rules! default_fns {
    ($($fn_name:ident => $const_name:ident : $ty:ty),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> $ty {
                defaults::$const_name
            }
        )*
    };
}

/// Generate default value functions that return String from &str constants.
macro_rules! default_string_fns {
    ($($fn_name:ident => $const_name:ident),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> String {
                defaults::$const_name.to_string()
            }
        )*
    };
}

default_fns! {
    default_poll_interval_secs    => DEFAULT_POLL_INTERVAL_SECS: u64,
    default_source_timeout_secs   => DEFAULT_SOURCE_TIMEOUT_SECS: u64,
    default_bucket_offset_secs    => DEFAULT_BUCKET_UTC_OFFSET_SECS: i64,
    default_db_max_connections    => DEFAULT_DB_MAX_CONNECTIONS: u32,
    default_db_min_connections    => DEFAULT_DB_MIN_CONNECTIONS: u32,
    default_db_connect_timeout_secs => DEFAULT_DB_CONNECT_TIMEOUT_SECS: u64,
}

default_string_fns! {
    default_api_server     => DEFAULT_API_SERVER,
    default_source_program => DEFAULT_SOURCE_PROGRAM,
}

/// Arguments of `v2ray api stats`; `{server}` is replaced by the API address.
pub(crate) fn default_source_args() -> Vec<String> {
    ["api", "stats", "--server={server}", "-json"]
        .into_iter()
        .map(String::from)
        .collect()
}

pub(crate) fn default_reset_flag() -> Option<String> {
    Some("-reset".to_string())
}

pub(crate) fn default_true() -> bool {
    true
}
