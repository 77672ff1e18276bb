use clap::{Args, Parser, Subcommand};
use log::debug;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tableside::redemption;

/// Staff side of the QR order flow
#[derive(Parser, Debug)]
#[command(name = "tableside")]
#[command(about = "client cli used by restaurant staffs to redeem guest orders", version, long_about = None
)]
struct Cli {
    #[arg(long, default_value = "http://localhost:8080", help = "Storefront server to talk to")]
    host: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser, Debug)]
enum Commands {
    /// order redemption ops
    #[command(arg_required_else_help = true)]
    Order(OrderArgs),
}

#[derive(Debug, Args)]
struct OrderArgs {
    #[command(subcommand)]
    command: OrderCmds,
}

#[derive(Debug, Subcommand)]
enum OrderCmds {
    /// Print the order id and code held by a scanned QR payload
    #[command(arg_required_else_help = true)]
    Inspect {
        #[arg(help = "Scanned QR content", value_name = "PAYLOAD")]
        payload: String,
    },
    /// Confirm a scanned order on behalf of a staff member
    #[command(arg_required_else_help = true)]
    Confirm {
        #[arg(help = "Scanned QR content", value_name = "PAYLOAD")]
        payload: String,
        #[arg(long, help = "Staff user id confirming the order", value_name = "STAFF_ID")]
        staff: String,
        #[arg(long, help = "Table to seat the order at", value_name = "TABLE")]
        table: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConfirmResponse {
    pub order_id: String,
    pub table_number: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));
    let args = Cli::parse();

    match args.command {
        Commands::Order(order) => match order.command {
            OrderCmds::Inspect { payload } => match redemption::decode(&payload) {
                Ok(decoded) => {
                    println!("order id = {}", decoded.order_id);
                    println!("code     = {}", decoded.redemption_code);
                }
                Err(e) => println!("{}, please scan again", e),
            },
            OrderCmds::Confirm {
                payload,
                staff,
                table,
            } => {
                // nothing goes to the server unless the scan is readable
                let decoded = match redemption::decode(&payload) {
                    Ok(decoded) => decoded,
                    Err(e) => {
                        println!("{}, please scan again", e);
                        return Ok(());
                    }
                };
                println!("confirming order={} as staff={}", decoded.order_id, staff);
                debug!("posting confirmation to {}", args.host);
                let payload = redemption::encode_payload(&decoded)?;
                let res = Client::new()
                    .post(format!("{}/{}", args.host.trim_end_matches('/'), "v1/orders/confirm"))
                    .json(&serde_json::json!({
                        "payload": payload,
                        "staff_id": staff,
                        "table_number": table,
                    }))
                    .send()
                    .await?;
                match res.status() {
                    StatusCode::OK => {
                        let res = res.json::<ConfirmResponse>().await?;
                        match res.table_number {
                            Some(table) => println!("order {} confirmed at table {}", res.order_id, table),
                            None => println!("order {} confirmed", res.order_id),
                        }
                    }
                    StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                        println!("order {} was not confirmed: {}", decoded.order_id, res.text().await?);
                    }
                    unexpected => {
                        println!("got unexpected status code, {}", unexpected);
                    }
                }
            }
        },
    };
    Ok(())
}
