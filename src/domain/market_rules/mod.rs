//! Market rules: per-symbol quantisation grid and bounds.

use rust_decimal::Decimal;

/// Exchange microstructure rules for one symbol pair.
///
/// All fields are exact decimals; precision fields are advisory for display
/// only. The authoritative grid for shaping is `(min_qty, min_qty_denom)` and
/// `(min_price, min_price_denom)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolRules {
    /// Minimum order quantity.
    pub min_qty: Decimal,
    /// Maximum order quantity.
    pub max_qty: Decimal,
    /// Quantity must land on `min_qty + n * min_qty_denom`.
    pub min_qty_denom: Decimal,
    /// Minimum order price.
    pub min_price: Decimal,
    /// Maximum order price.
    pub max_price: Decimal,
    /// Price must land on `min_price + n * min_price_denom`.
    pub min_price_denom: Decimal,
    /// Minimum notional (`price * qty`) value in quote asset.
    pub min_notional: Decimal,
    /// Decimal digits to display the base asset quantity with.
    pub base_asset_precision: u32,
    /// Decimal digits to display the quote asset price with.
    pub quote_asset_precision: u32,
}

/// Supplies per-symbol quantisation and bounds.
///
/// Implemented by an infrastructure adapter that reads exchange metadata;
/// this crate only defines the contract.
pub trait MarketRulesProvider: Send + Sync {
    /// Look up the rules for a base/quote asset pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the pair is unknown to the provider.
    fn get_symbol_rules(
        &self,
        base_asset: &str,
        quote_asset: &str,
    ) -> Result<SymbolRules, crate::error::EngineError>;
}
