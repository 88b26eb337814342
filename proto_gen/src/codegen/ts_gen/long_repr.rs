//! 64-bit integer representation strategies.
//!
//! | policy   | TypeScript type | backing value                          |
//! |----------|-----------------|----------------------------------------|
//! | `string` | `string`        | decimal text, lossless for every width |
//! | `number` | `number`        | IEEE-754 double, lossy beyond 2^53     |
//! | `bigint` | `bigint`        | arbitrary precision integer            |

use super::ts_type::{TsPrimitive, TsType};
use proto_types::LongRepresentation;

pub trait LongStrategy: Sync {
  fn ts_type(&self) -> TsType;
}

pub struct DecimalStringLong;
pub struct NativeNumberLong;
pub struct BigIntLong;

impl LongStrategy for DecimalStringLong {
  fn ts_type(&self) -> TsType {
    TsType::primitive(TsPrimitive::String)
  }
}

impl LongStrategy for NativeNumberLong {
  fn ts_type(&self) -> TsType {
    TsType::primitive(TsPrimitive::Number)
  }
}

impl LongStrategy for BigIntLong {
  fn ts_type(&self) -> TsType {
    TsType::primitive(TsPrimitive::BigInt)
  }
}

pub fn long_strategy(repr: LongRepresentation) -> &'static dyn LongStrategy {
  match repr {
    LongRepresentation::String => &DecimalStringLong,
    LongRepresentation::Number => &NativeNumberLong,
    LongRepresentation::BigInt => &BigIntLong,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn each_policy_selects_a_distinct_type() {
    let rendered: Vec<String> = [
      LongRepresentation::String,
      LongRepresentation::Number,
      LongRepresentation::BigInt,
    ]
    .into_iter()
    .map(|repr| long_strategy(repr).ts_type().to_string())
    .collect();
    assert_eq!(rendered, ["string", "number", "bigint"]);
  }
}
