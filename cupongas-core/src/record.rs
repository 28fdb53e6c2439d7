//! Coupon summary model handed to the presentation layer

use serde::Serialize;

/// Coupons granted per affiliate per period when no sheet says otherwise
pub const MONTHLY_COUPON_CAP: f64 = 4.0;

/// Aggregated coupon usage for one affiliate over the current period.
///
/// Quantity containers always carry every fixed size/category key, so the
/// presentation layer never has to deal with absent entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CouponRecord {
    pub rut: String,
    pub nombres: String,
    pub apellidos: String,
    pub establecimiento: String,
    pub lipigas: CylinderCounts,
    pub abastible: CylinderCounts,
    pub compras: PurchaseCounts,
    pub usado_en_el_mes: f64,
    pub disponible: f64,
}

impl Default for CouponRecord {
    fn default() -> Self {
        CouponRecord {
            rut: String::new(),
            nombres: String::new(),
            apellidos: String::new(),
            establecimiento: String::new(),
            lipigas: CylinderCounts::default(),
            abastible: CylinderCounts::default(),
            compras: PurchaseCounts::default(),
            usado_en_el_mes: 0.0,
            disponible: MONTHLY_COUPON_CAP,
        }
    }
}

/// Per-size cylinder quantities for one vendor (5/11/15/45 kg)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CylinderCounts {
    #[serde(rename = "5")]
    pub kg5: f64,
    #[serde(rename = "11")]
    pub kg11: f64,
    #[serde(rename = "15")]
    pub kg15: f64,
    #[serde(rename = "45")]
    pub kg45: f64,
}

impl CylinderCounts {
    pub fn total(&self) -> f64 {
        self.kg5 + self.kg11 + self.kg15 + self.kg45
    }
}

/// Incidental purchase counters carried on ledger rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PurchaseCounts {
    pub cine: f64,
    pub energy: f64,
    pub jumper: f64,
}

impl PurchaseCounts {
    pub fn total(&self) -> f64 {
        self.cine + self.energy + self.jumper
    }
}
