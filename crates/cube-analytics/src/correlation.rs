//! 상관계수 계산 모듈.
//!
//! 보유 종목 간 수익률 움직임의 상관관계를 계산합니다.
//! 대시보드의 상관행렬 히트맵에 사용됩니다.
//!
//! # 예시
//!
//! ```
//! use cube_analytics::correlation::calculate_correlation;
//!
//! let returns_a = [0.01, -0.02, 0.015, 0.005];
//! let returns_b = [0.02, -0.04, 0.03, 0.01];
//!
//! let corr = calculate_correlation(&returns_a, &returns_b).unwrap_or(0.0);
//! assert!((corr - 1.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

/// 상관행렬 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    /// 종목 목록 (행/열 순서)
    pub symbols: Vec<String>,
    /// 상관계수 행렬 (N×N, -1.0 ~ 1.0)
    pub matrix: Vec<Vec<f64>>,
    /// 분석에 사용된 수익률 개수
    pub period: usize,
}

impl CorrelationMatrix {
    /// 두 종목 간 상관계수를 조회합니다.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.symbols.iter().position(|s| s == a)?;
        let j = self.symbols.iter().position(|s| s == b)?;
        Some(self.matrix[i][j])
    }
}

/// Pearson 상관계수 계산.
///
/// # 반환
///
/// 상관계수 (-1.0 ~ 1.0). 길이가 다르거나 2 미만이면, 또는 한쪽의
/// 변동이 없으면 None.
pub fn calculate_correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }

    let n = x.len() as f64;

    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;

    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    // 부동소수점 오차로 범위를 살짝 벗어나는 경우 보정
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

/// 종목별 수익률 시계열로 상관행렬을 계산합니다.
///
/// # 인자
///
/// * `returns_by_symbol` - (종목코드, 수익률) 목록. 행렬의 행/열 순서는 입력 순서를 따릅니다.
///
/// 시계열 길이가 다르면 가장 짧은 길이에 맞춰 앞부분만 사용합니다.
/// 변동이 없는 종목과의 상관계수는 0.0입니다.
///
/// # 반환
///
/// 종목이 2개 미만이거나 공통 수익률이 2개 미만이면 None
pub fn correlation_matrix(returns_by_symbol: &[(String, Vec<f64>)]) -> Option<CorrelationMatrix> {
    let n = returns_by_symbol.len();
    if n < 2 {
        return None;
    }

    let min_len = returns_by_symbol
        .iter()
        .map(|(_, r)| r.len())
        .min()
        .unwrap_or(0);
    if min_len < 2 {
        return None;
    }

    let mut matrix = vec![vec![0.0; n]; n];

    for i in 0..n {
        matrix[i][i] = 1.0;
        // 상삼각만 계산 후 대칭 복사
        for j in (i + 1)..n {
            let corr = calculate_correlation(
                &returns_by_symbol[i].1[..min_len],
                &returns_by_symbol[j].1[..min_len],
            )
            .unwrap_or(0.0);
            matrix[i][j] = corr;
            matrix[j][i] = corr;
        }
    }

    Some(CorrelationMatrix {
        symbols: returns_by_symbol.iter().map(|(s, _)| s.clone()).collect(),
        matrix,
        period: min_len,
    })
}
