//! Order-flow measures from taker-buy volume.
//!
//! sell = V - TB
//! Volume_Delta = TB - sell
//! OFI = Volume_Delta / V
//!
//! A zero-volume candle makes OFI undefined (0/0) or infinite.

use crate::domain::candle::Candle;

#[derive(Debug, Clone, PartialEq)]
pub struct OrderFlow {
    pub ofi: Vec<f64>,
    pub volume_delta: Vec<f64>,
}

pub fn volume_delta(candle: &Candle) -> f64 {
    candle.taker_buy_base_volume - candle.sell_volume()
}

pub fn order_flow_imbalance(candle: &Candle) -> f64 {
    volume_delta(candle) / candle.volume
}

pub fn calculate_order_flow(candles: &[Candle]) -> OrderFlow {
    OrderFlow {
        ofi: candles.iter().map(order_flow_imbalance).collect(),
        volume_delta: candles.iter().map(volume_delta).collect(),
    }
}
