use serde::Serialize;
use tokio::time::Duration;
use tracing_subscriber::EnvFilter;

use relay_core::app::global;
use relay_core::{Bridge, BridgeConfig, ErrorPayload, Fault, RelayError, TaskRunner};

#[derive(Debug, Serialize)]
struct Greeting {
    message: String,
}

fn greet(name: &str) -> Result<Greeting, Fault> {
    if name.is_empty() {
        return Err(Fault::new("name must not be empty"));
    }
    Ok(Greeting {
        message: format!("Hello, {name}!"),
    })
}

/// 遅い work（transport 側のタイムアウトを起こす）
fn slow_job(delay: Duration) -> Result<(), Fault> {
    std::thread::sleep(delay);
    Ok(())
}

fn load_config() -> Result<BridgeConfig, RelayError> {
    match std::env::args().nth(1) {
        Some(path) => BridgeConfig::load(path),
        None => Ok(BridgeConfig {
            reply_timeout_ms: 500,
            ..BridgeConfig::default()
        }),
    }
}

#[tokio::main]
async fn main() -> Result<(), RelayError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // (A) Bridge を構築してプロセス全体に公開
    let config = load_config()?;
    let bridge = Bridge::builder().config(config).build()?;
    global::init(bridge.clone());

    // translator は後から差し替えられる
    global::install_translator(|fault: &Fault| {
        ErrorPayload::new(fault.message()).with_code(format!("{:?}", fault.kind()).to_uppercase())
    });

    // (B) transport 側: slot を開いて key を受け取る
    let ok = bridge.defer();
    let failed = bridge.defer();
    let slow = bridge.defer();

    // (C) work を key 経由で投入（実行は tokio の blocking pool）
    TaskRunner::for_key(&bridge, || greet("relay"), ok.key().clone()).spawn();
    TaskRunner::for_key(&bridge, || greet(""), failed.key().clone()).spawn();
    let slow_delay = bridge.config().reply_timeout() * 2;
    TaskRunner::for_key(&bridge, move || slow_job(slow_delay), slow.key().clone()).spawn();

    // 未登録の key: ログに出るだけで work は走る
    TaskRunner::for_key(&bridge, || greet("nobody"), "unknown-key").spawn();

    // (D) waiter 側で結果を観測
    for (label, pending) in [("ok", ok), ("failed", failed), ("slow", slow)] {
        match pending.wait().await {
            Ok(Ok(reply)) => println!("{label}: reply={reply:?}"),
            Ok(Err(payload)) => println!("{label}: error={payload:?}"),
            Err(err) => println!("{label}: no outcome ({err})"),
        }
    }

    // (E) 遅い work の遅延配送が no-op で終わるのを待つ
    tokio::time::sleep(bridge.config().reply_timeout() * 2).await;
    println!("registered slots left: {}", bridge.registry().len());
    Ok(())
}
