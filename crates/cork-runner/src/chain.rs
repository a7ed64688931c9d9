use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use ethers::{
    core::utils::Anvil,
    middleware::{
        nonce_manager::NonceManagerError, MiddlewareError, NonceManagerMiddleware,
        SignerMiddleware,
    },
    providers::{Http, Middleware, PendingTransaction, Provider},
    signers::{LocalWallet, Signer},
    types::{transaction::eip2718::TypedTransaction, Address, BlockId},
    utils::AnvilInstance,
};
use tracing::debug;

use crate::errors::{Result, RunnerError, Step};

type ChainClientInner<S> = NonceManagerMiddleware<SignerMiddleware<Provider<Http>, S>>;

#[derive(Debug)]
pub struct ChainClient<S: Signer + 'static> {
    inner: ChainClientInner<S>,
    address: Address,
}

/// A client with a provider stack that includes a signer and a nonce manager.
impl<S: Signer + 'static> ChainClient<S> {
    pub async fn new(provider: Provider<Http>, signer: S) -> Result<Self> {
        // The signer middleware asks the node for its chain id so that
        // transactions are signed for the right chain.
        let inner = SignerMiddleware::new_with_provider_chain(provider, signer)
            .await
            .map_err(|err| RunnerError::from_middleware_error(Step::Connect, err))?;
        let address = inner.address();
        let inner = NonceManagerMiddleware::new(inner, address);

        Ok(Self { inner, address })
    }

    /// Gets the client's address.
    pub fn address(&self) -> Address {
        self.address
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl<S: Signer + 'static> Middleware for ChainClient<S> {
    // NOTE: This is a pass-through middleware implementation, so we just use
    // the error from the top of the middleware stack.
    type Error = NonceManagerError<Self::Inner>;

    type Provider = Http;
    type Inner = ChainClientInner<S>;

    fn inner(&self) -> &Self::Inner {
        &self.inner
    }

    async fn send_transaction<T: Into<TypedTransaction> + Send + Sync>(
        &self,
        tx: T,
        block: Option<BlockId>,
    ) -> std::result::Result<PendingTransaction<'_, Self::Provider>, Self::Error> {
        let tx = tx.into();
        debug!(from = ?self.address, to = ?tx.to(), "sending transaction");
        self.inner
            .send_transaction(tx, block)
            .await
            .map_err(MiddlewareError::from_err)
    }
}

/// An abstraction over Ethereum chains that provides convenience methods for
/// constructing providers and clients.
pub struct Chain {
    provider: Provider<Http>,
    client_version: String,
    maybe_anvil: Option<AnvilInstance>,
}

impl Chain {
    /// Constructs a new `Chain` from an Ethereum RPC URL. If the RPC URL is
    /// excluded, a local anvil node is spun up.
    pub async fn connect(maybe_rpc_url: Option<&str>) -> Result<Self> {
        let (rpc_url, maybe_anvil) = match maybe_rpc_url {
            Some(rpc_url) => (rpc_url.to_string(), None),
            None => {
                let anvil = Anvil::new().spawn();
                (anvil.endpoint(), Some(anvil))
            }
        };
        let provider = Provider::<Http>::try_from(rpc_url.as_str())
            .map_err(|err| RunnerError::Config(format!("bad RPC url {:?}: {}", rpc_url, err)))?
            .interval(Duration::from_millis(10));

        // Ask the node who it is. This is the first request we send, so it's
        // where an unreachable node shows up.
        let client_version = provider
            .client_version()
            .await
            .map_err(|err| RunnerError::from_middleware_error(Step::Connect, err))?;
        debug!(%rpc_url, %client_version, "connected");

        Ok(Self {
            provider,
            client_version,
            maybe_anvil,
        })
    }

    /// A provider that can access the chain.
    pub fn provider(&self) -> Provider<Http> {
        self.provider.clone()
    }

    /// A client that can sign transactions on the chain.
    pub async fn client<S: Signer + 'static>(&self, signer: S) -> Result<Arc<ChainClient<S>>> {
        Ok(Arc::new(ChainClient::new(self.provider(), signer).await?))
    }

    /// The node's self-reported client version.
    pub fn client_version(&self) -> &str {
        &self.client_version
    }

    /// The pre-funded accounts of the anvil node this chain spawned. Chains
    /// that were connected to by URL don't have any.
    pub fn anvil_accounts(&self) -> Vec<LocalWallet> {
        match &self.maybe_anvil {
            Some(anvil) => anvil.keys().iter().map(|key| key.clone().into()).collect(),
            None => vec![],
        }
    }

    /// Checks to see if the underlying chain is an anvil chain. Anvil mines
    /// each transaction as soon as it arrives.
    pub fn is_anvil(&self) -> bool {
        self.client_version.to_lowercase().contains("anvil")
    }
}
