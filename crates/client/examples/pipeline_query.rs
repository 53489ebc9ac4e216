// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Submit a factor-model pipeline, wait for it to finish, and print the
//! first rows of its result table.
//!
//! Needs an API key in `~/.quantopian/credentials` or `QUANTOPIAN_API_KEY`.

use std::thread;
use std::time::Duration;

use aqueduct_client::{create_client, ClientError, ExecutionRequest};

const PIPELINE_CODE: &str = r#"
from quantopian.pipeline import Pipeline
from quantopian.pipeline.data import EquityPricing
from quantopian.pipeline.data.factset import Fundamentals
from quantopian.pipeline.domain import US_EQUITIES
from quantopian.pipeline.factors import AverageDollarVolume

avg_day_dv_200 = AverageDollarVolume(window_length=200)
mcap = Fundamentals.mkt_val.latest
price = EquityPricing.close.latest

universe = (
    avg_day_dv_200.percentile_between(5, 100)
    & (price > 5.0)
    & (mcap > 100e6)
)

def make_pipeline():
    return Pipeline(
        columns={
            "log_mcap": mcap.log().zscore(),
        },
        screen=mcap.top(500, mask=universe),
        domain=US_EQUITIES,
    )
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let client = create_client()?;

    let request = ExecutionRequest::new(PIPELINE_CODE, "2019-01-01", "2019-06-30")
        .with_name("example factor model");
    let id = client.submit_execution(&request)?;
    println!("submitted execution {id}");

    loop {
        let execution = client.get_execution(&id)?;
        println!("status: {:?}", execution.status);
        if execution.status.is_terminal() {
            break;
        }
        thread::sleep(Duration::from_secs(10));
    }

    match client.get_result_table(&id) {
        Ok(table) => {
            println!("columns: {:?}", table.columns());
            for row in table.rows().iter().take(10) {
                println!("{} {} {:?}", row.date, row.asset, row.values);
            }
        }
        Err(ClientError::ExecutionFailed(_)) => {
            let error = client.get_execution_error(&id)?;
            println!(
                "execution failed in {} at line {}: {}",
                error.method.unwrap_or_default(),
                error.line_number.unwrap_or_default(),
                error.message.unwrap_or_default(),
            );
        }
        Err(other) => return Err(other.into()),
    }

    Ok(())
}
