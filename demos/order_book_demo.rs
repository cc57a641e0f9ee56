//! Order Book Demo - polls the server and renders a depth view.
//!
//! Loads connection settings from `rpc_setting.json`, fetches the top 11
//! levels twice a second and prints the aggregated depth. Any failure
//! terminates the process; reconnecting is the operator's job.

use std::time::Duration;

use rust_decimal::Decimal;

use level3_client::{logger, ClientConfig, ClientSettings, DepthView, RpcClient};

const DEPTH: u32 = 11;
const POLL_INTERVAL: Duration = Duration::from_millis(500);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger::init_logger("level3_client=debug,info", false);

    let settings = ClientSettings::load();
    let client = RpcClient::connect(ClientConfig::from(settings)).await?;

    loop {
        let book = client.get_order_book(DEPTH).await?;
        let view = DepthView::from_order_book(&book, Decimal::ZERO, DEPTH as usize);
        println!("{}", view.render());
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
