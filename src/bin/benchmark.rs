use chrono::Utc;
use chrono_tz::Tz;
use colored::*;
use governor::{Quota, RateLimiter};
use hdrhistogram::Histogram;
use reqwest::Client;
use serde_json::Value;
use std::env;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

const DURATION_SECS: u64 = 20;

struct Target {
    name: &'static str,
    url: String,
}

#[tokio::main]
async fn main() {
    let base_url = env::var("BENCH_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

    println!("{}", "🚀 Starting Benchmark Suite".bold().green());
    println!("Target URL: {}", base_url);

    let client = Client::builder()
        .pool_max_idle_per_host(1000)
        .timeout(Duration::from_secs(10))
        .build()
        .expect("Failed to build HTTP client");

    if client.get(format!("{}/health", base_url)).send().await.is_err() {
        eprintln!("{}", format!("❌ Server is NOT reachable at {}. Please start it first.", base_url).red().bold());
        return;
    }

    let mut targets = vec![
        Target {
            name: "Health Check (Public)",
            url: format!("{}/health", base_url),
        },
        Target {
            name: "List Venues (Public Read)",
            url: format!("{}/api/v1/venues", base_url),
        },
    ];

    println!("\n{}", "⚙️  Looking up a venue and sport to benchmark slots...".yellow());
    match discover_venue_sport(&client, &base_url).await {
        Some((venue_id, sport_id)) => {
            let tz: Tz = env::var("VENUE_TIMEZONE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(chrono_tz::Asia::Kolkata);
            let today = Utc::now().with_timezone(&tz).date_naive();

            println!("{}", "✅ Found benchmark data.".green());
            println!("   Venue ID: {}", venue_id);
            println!("   Sport ID: {}", sport_id);

            targets.push(Target {
                name: "Slots For Today (Generate Once, Then Read)",
                url: format!("{}/api/v1/venues/{}/sports/{}/slots?date={}", base_url, venue_id, sport_id, today),
            });
        }
        None => {
            println!("{}", "⚠️  No venue with a linked sport found, skipping slot benchmark.".yellow());
        }
    }

    let rps_stages = vec![10, 50, 200, 1000];

    for target in targets {
        println!("\n{}", "=".repeat(60));
        println!("Benchmarking Endpoint: {}", target.name.cyan().bold());
        println!("URL: {}", target.url);
        println!("{}", "=".repeat(60));

        println!("{:<10} | {:<15} | {:<15} | {:<15}", "RPS", "Mean (ms)", "P99 (ms)", "Success Rate");
        println!("{:-<10}-+-{:-<15}-+-{:-<15}-+-{:-<15}", "", "", "", "");

        for &rps in &rps_stages {
            run_stage(&client, &target, rps).await;
        }
    }
}

/// First venue that offers at least one sport.
async fn discover_venue_sport(client: &Client, base_url: &str) -> Option<(String, String)> {
    let venues: Value = client.get(format!("{}/api/v1/venues", base_url))
        .send().await.ok()?
        .json().await.ok()?;

    for venue in venues.as_array()? {
        let venue_id = venue["id"].as_str()?;
        let sports: Value = client.get(format!("{}/api/v1/venues/{}/sports", base_url, venue_id))
            .send().await.ok()?
            .json().await.ok()?;

        if let Some(sport_id) = sports.as_array().and_then(|s| s.first()).and_then(|s| s["id"].as_str()) {
            return Some((venue_id.to_string(), sport_id.to_string()));
        }
    }
    None
}

async fn run_stage(client: &Client, target: &Target, rps: u32) {
    let Some(per_second) = NonZeroU32::new(rps) else {
        return;
    };
    let limiter = Arc::new(RateLimiter::direct(Quota::per_second(per_second)));

    let (tx, mut rx) = mpsc::channel(50000);
    let start_time = Instant::now();
    let duration = Duration::from_secs(DURATION_SECS);

    loop {
        if start_time.elapsed() > duration {
            break;
        }

        if limiter.check().is_ok() {
            let client = client.clone();
            let url = target.url.clone();
            let tx = tx.clone();

            tokio::spawn(async move {
                let req_start = Instant::now();
                let res = client.get(&url).send().await;
                let latency = req_start.elapsed();

                let success = match res {
                    Ok(r) => r.status().is_success(),
                    Err(_) => false,
                };

                let _ = tx.send((latency, success)).await;
            });
        } else {
            tokio::task::yield_now().await;
        }
    }

    drop(tx);

    let mut histogram = Histogram::<u64>::new(3).expect("valid histogram precision");
    let mut successes = 0;
    let mut total = 0;

    while let Some((latency, success)) = rx.recv().await {
        total += 1;
        if success { successes += 1; }
        let _ = histogram.record(latency.as_micros() as u64);
    }

    let mean_ms = histogram.mean() / 1000.0;
    let p99_ms = histogram.value_at_quantile(0.99) as f64 / 1000.0;
    let success_rate = if total > 0 { (successes as f64 / total as f64) * 100.0 } else { 0.0 };

    println!(
        "{:<10} | {:<15.2} | {:<15.2} | {:<14.1}%",
        rps,
        mean_ms,
        p99_ms,
        success_rate
    );

    tokio::time::sleep(Duration::from_millis(500)).await;
}
