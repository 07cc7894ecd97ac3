use rust_decimal::Decimal;

/// Base currency used when none is configured
pub const DEFAULT_BASE_CURRENCY: &str = "CHF";

/// Relative distance from the consensus above which an observation is flagged (10%)
pub const DEFAULT_DEVIATION_THRESHOLD: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Fiat catalog file name
pub const FIAT_CATALOG_FILE: &str = "currencies.json";

/// Crypto catalog file name
pub const CRYPTO_CATALOG_FILE: &str = "crypto.json";

/// Published consensus table
pub const RATES_FILE: &str = "rates.json";

/// Published provenance metadata
pub const META_FILE: &str = "meta.json";

/// Date format of snapshot and publication directories
pub const DATE_FORMAT: &str = "%Y-%m-%d";
