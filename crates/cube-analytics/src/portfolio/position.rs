//! 보유 포지션.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 섹터가 지정되지 않은 포지션이 집계되는 섹터 이름
pub const UNCLASSIFIED_SECTOR: &str = "Other";

/// 포트폴리오 보유 포지션.
///
/// 금액 필드는 부동소수점 오차를 피하기 위해 `Decimal`을 사용합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// 종목 코드 (예: "AAPL")
    pub symbol: String,
    /// 종목명
    pub name: String,
    /// 보유 수량
    pub shares: Decimal,
    /// 평균 매입 단가
    pub cost_basis: Decimal,
    /// 섹터 (없으면 "Other"로 집계)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
}

impl Position {
    /// 새 포지션을 생성합니다.
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        shares: Decimal,
        cost_basis: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            shares,
            cost_basis,
            sector: None,
        }
    }

    /// 섹터를 지정합니다.
    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    /// 매입 금액 (수량 × 평균 단가).
    pub fn cost_value(&self) -> Decimal {
        self.shares * self.cost_basis
    }

    /// 집계용 섹터 이름.
    pub fn sector_or_default(&self) -> &str {
        self.sector.as_deref().unwrap_or(UNCLASSIFIED_SECTOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cost_value() {
        let position = Position::new("MSFT", "Microsoft Corp.", dec!(80), dec!(310.25));
        assert_eq!(position.cost_value(), dec!(24820));
    }

    #[test]
    fn test_sector_default() {
        let position = Position::new("XYZ", "Unknown", dec!(1), dec!(10));
        assert_eq!(position.sector_or_default(), "Other");

        let position = position.with_sector("Energy");
        assert_eq!(position.sector_or_default(), "Energy");
    }

    #[test]
    fn test_serialization_skips_missing_sector() {
        let position = Position::new("XYZ", "Unknown", dec!(1), dec!(10));
        let json = serde_json::to_value(&position).unwrap();
        assert!(json.get("sector").is_none());

        let parsed: Position = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, position);
    }
}
