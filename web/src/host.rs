//! Browser side of the host collaborators: the injected EIP-1193 wallet, the compose window
//! used for sharing and the mini app SDK.

use gloo::timers::future::TimeoutFuture;
use gloo::utils::window;
use js_sys::{Function, JSON, Promise, Reflect};
use minisnake_core::{
    BASE_CHAIN_ID, BASE_CHAIN_ID_HEX, BASE_CHAIN_NAME, BASE_EXPLORER_URL, BASE_RPC_URL, COMPOSE_URL,
    HostError, MINT_SCORE_THRESHOLD, MintStatus, UNRECOGNIZED_CHAIN_CODE, mint_calldata,
    receipt_succeeded, share_text,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use yew::Callback;

use crate::utils::encode_component;

const RECEIPT_POLL_MS: u32 = 1_500;
const RECEIPT_POLL_ATTEMPTS: u32 = 80;

#[derive(Deserialize, Debug)]
struct Receipt {
    status: Option<String>,
}

fn lookup(root: &JsValue, path: &[&str]) -> Option<JsValue> {
    path.iter().try_fold(root.clone(), |value, key| {
        Reflect::get(&value, &JsValue::from_str(key))
            .ok()
            .filter(|next| !next.is_undefined() && !next.is_null())
    })
}

fn provider() -> Result<JsValue, HostError> {
    lookup(&window(), &["ethereum"]).ok_or(HostError::NoProvider)
}

fn error_code(err: &JsValue) -> Option<i64> {
    lookup(err, &["code"])
        .and_then(|code| code.as_f64())
        .map(|code| code as i64)
}

/// Maps a thrown JS value onto a [`HostError`].
pub(crate) fn classify_js(err: &JsValue) -> HostError {
    let message = lookup(err, &["message"])
        .and_then(|message| message.as_string())
        .or_else(|| err.as_string())
        .unwrap_or_default();
    let error = HostError::classify(error_code(err), &message);
    log::error!("host call failed: {} ({:?})", message, error);
    error
}

fn decode<T: DeserializeOwned>(value: &JsValue) -> Result<T, HostError> {
    let text = JSON::stringify(value)
        .ok()
        .and_then(|text| text.as_string())
        .unwrap_or_else(|| "null".to_string());
    serde_json::from_str(&text).map_err(|err| HostError::Unknown(err.to_string()))
}

async fn raw_request(
    provider: &JsValue,
    method: &str,
    params: serde_json::Value,
) -> Result<JsValue, JsValue> {
    let request: Function = Reflect::get(provider, &JsValue::from_str("request"))?.dyn_into()?;
    let args = JSON::parse(&json!({ "method": method, "params": params }).to_string())?;
    let promise: Promise = request.call1(provider, &args)?.dyn_into()?;
    JsFuture::from(promise).await
}

async fn request<T: DeserializeOwned>(
    provider: &JsValue,
    method: &str,
    params: serde_json::Value,
) -> Result<T, HostError> {
    log::debug!("{}", method);
    let value = raw_request(provider, method, params)
        .await
        .map_err(|err| classify_js(&err))?;
    decode(&value)
}

/// Account the wallet already exposes to this page, without prompting.
pub(crate) async fn existing_account() -> Option<String> {
    let provider = provider().ok()?;
    match request::<Vec<String>>(&provider, "eth_accounts", json!([])).await {
        Ok(accounts) => accounts.into_iter().next(),
        Err(err) => {
            log::warn!("could not read accounts: {}", err);
            None
        }
    }
}

/// Asks the wallet for an account. `Ok(None)` when the wallet handed out none.
pub(crate) async fn connect_wallet() -> Result<Option<String>, HostError> {
    let provider = provider().inspect_err(|_| log::warn!("no wallet provider injected"))?;
    let accounts: Vec<String> = request(&provider, "eth_requestAccounts", json!([])).await?;
    Ok(accounts.into_iter().next())
}

async fn on_base(provider: &JsValue) -> Result<bool, HostError> {
    let chain_id: String = request(provider, "eth_chainId", json!([])).await?;
    Ok(chain_id.eq_ignore_ascii_case(BASE_CHAIN_ID_HEX))
}

/// Switches the wallet to Base, registering the chain first if the wallet does not know it.
pub(crate) async fn switch_network(provider: &JsValue) -> Result<(), HostError> {
    let switch = json!([{ "chainId": BASE_CHAIN_ID_HEX }]);
    match raw_request(provider, "wallet_switchEthereumChain", switch).await {
        Ok(_) => Ok(()),
        Err(err) if error_code(&err) == Some(UNRECOGNIZED_CHAIN_CODE) => {
            log::debug!("chain {} unknown to wallet, adding it", BASE_CHAIN_ID);
            let add = json!([{
                "chainId": BASE_CHAIN_ID_HEX,
                "chainName": BASE_CHAIN_NAME,
                "nativeCurrency": { "name": "Ether", "symbol": "ETH", "decimals": 18 },
                "rpcUrls": [BASE_RPC_URL],
                "blockExplorerUrls": [BASE_EXPLORER_URL],
            }]);
            raw_request(provider, "wallet_addEthereumChain", add)
                .await
                .map(|_| ())
                .map_err(|err| classify_js(&err))
        }
        Err(err) => Err(classify_js(&err)),
    }
}

async fn wait_for_receipt(provider: &JsValue, tx_hash: &str) -> Result<(), HostError> {
    for _ in 0..RECEIPT_POLL_ATTEMPTS {
        let receipt: Option<Receipt> =
            request(provider, "eth_getTransactionReceipt", json!([tx_hash])).await?;
        match receipt.and_then(|receipt| receipt.status) {
            Some(status) => {
                return match receipt_succeeded(&status) {
                    Some(true) => Ok(()),
                    Some(false) => Err(HostError::Contract),
                    None => Err(HostError::Unknown(format!("receipt status {status}"))),
                };
            }
            None => TimeoutFuture::new(RECEIPT_POLL_MS).await,
        }
    }
    Err(HostError::Unknown("Timed out waiting for confirmation".to_string()))
}

/// Sends `mintScore(score)` from `from` to `contract` and waits for it to land. Intermediate
/// steps are reported through `progress`; the final status is left to the caller.
pub(crate) async fn mint_score(
    contract: String,
    from: String,
    score: u32,
    progress: Callback<MintStatus>,
) -> Result<String, HostError> {
    if score < MINT_SCORE_THRESHOLD {
        return Err(HostError::ScoreTooLow);
    }
    let provider = provider()?;

    progress.emit(MintStatus::CheckingNetwork);
    if !on_base(&provider).await? {
        progress.emit(MintStatus::SwitchingNetwork);
        switch_network(&provider).await?;
    }

    progress.emit(MintStatus::Preparing);
    let tx = json!([{ "from": from, "to": contract, "data": mint_calldata(score) }]);

    progress.emit(MintStatus::AwaitingSignature);
    let tx_hash: String = request(&provider, "eth_sendTransaction", tx).await?;
    log::debug!("mint sent: {}", tx_hash);

    progress.emit(MintStatus::Confirming {
        tx_hash: tx_hash.clone(),
    });
    wait_for_receipt(&provider, &tx_hash).await?;

    log::info!("score {} minted in {}", score, tx_hash);
    Ok(tx_hash)
}

fn compose_url(score: u32) -> String {
    let embed = window().location().href().unwrap_or_default();
    format!(
        "{}?text={}&embeds[]={}",
        COMPOSE_URL,
        encode_component(&share_text(score)),
        encode_component(&embed)
    )
}

/// Opens the cast composer prefilled with the score. Fire and forget.
pub(crate) fn share_score(score: u32) {
    let url = compose_url(score);
    log::debug!("share: {}", url);
    if let Err(err) = window().open_with_url_and_target(&url, "_blank") {
        classify_js(&err);
    }
}

/// Tells the embedding host the app is ready to be shown.
pub(crate) fn signal_ready() {
    let Some(actions) = lookup(&window(), &["sdk", "actions"]) else {
        log::debug!("no mini app sdk, skipping ready signal");
        return;
    };
    let ready = lookup(&actions, &["ready"]).and_then(|ready| ready.dyn_into::<Function>().ok());
    match ready.map(|ready| ready.call0(&actions)) {
        Some(Ok(_)) => log::debug!("ready signal sent"),
        Some(Err(err)) => log::warn!("ready signal failed: {:?}", err),
        None => log::warn!("mini app sdk has no ready action"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn js_error(code: Option<f64>, message: &str) -> JsValue {
        let err = js_sys::Object::new();
        if let Some(code) = code {
            Reflect::set(&err, &"code".into(), &code.into()).unwrap();
        }
        Reflect::set(&err, &"message".into(), &message.into()).unwrap();
        err.into()
    }

    #[wasm_bindgen_test]
    fn classifies_thrown_values() {
        assert_eq!(
            classify_js(&js_error(Some(4001.), "nope")),
            HostError::RejectedByUser
        );
        assert_eq!(
            classify_js(&js_error(Some(-32603.), "reverted")),
            HostError::Contract
        );
        assert_eq!(
            classify_js(&JsValue::from_str("something odd")),
            HostError::Unknown("something odd".to_string())
        );
    }

    #[wasm_bindgen_test]
    fn decodes_provider_results() {
        let accounts = JSON::parse(r#"["0xabc", "0xdef"]"#).unwrap();
        assert_eq!(
            decode::<Vec<String>>(&accounts).unwrap(),
            vec!["0xabc".to_string(), "0xdef".to_string()]
        );

        let receipt: Option<Receipt> = decode(&JsValue::NULL).unwrap();
        assert!(receipt.is_none());

        let receipt = JSON::parse(r#"{"status": "0x1", "blockNumber": "0x10"}"#).unwrap();
        let receipt: Option<Receipt> = decode(&receipt).unwrap();
        assert_eq!(receipt.and_then(|r| r.status).as_deref(), Some("0x1"));
    }

    #[wasm_bindgen_test]
    fn compose_url_carries_the_score() {
        let url = compose_url(40);
        assert!(url.starts_with("https://warpcast.com/~/compose?text=Just%20scored%2040%20points"));
        assert!(url.contains("&embeds[]="));
    }

    #[wasm_bindgen_test]
    async fn connect_without_wallet_reports_missing_provider() {
        if provider().is_ok() {
            return;
        }
        assert_eq!(connect_wallet().await, Err(HostError::NoProvider));
        assert_eq!(existing_account().await, None);
    }
}
