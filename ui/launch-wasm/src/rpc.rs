//! Minimal Solana JSON-RPC client. Only `getBalance` is needed to show
//! the SOL balance toast after a connect.

use gloo_net::http::Request;
use serde::Deserialize;
use serde_json::json;
use unifa_session::network::NetworkConfig;

#[derive(Deserialize)]
struct RpcResponse {
    result: Option<RpcResult>,
    error: Option<RpcError>,
}

#[derive(Deserialize)]
struct RpcResult {
    value: u64,
}

#[derive(Deserialize)]
struct RpcError {
    message: String,
}

/// Balance of `address` in lamports on the given network.
pub async fn get_balance(network: &NetworkConfig, address: &str) -> Result<u64, String> {
    let body = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "getBalance",
        "params": [address, { "commitment": "confirmed" }],
    });

    let response = Request::post(network.rpc_url)
        .json(&body)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let parsed: RpcResponse = response.json().await.map_err(|e| e.to_string())?;
    if let Some(err) = parsed.error {
        return Err(err.message);
    }
    parsed
        .result
        .map(|r| r.value)
        .ok_or_else(|| "empty getBalance response".to_string())
}
