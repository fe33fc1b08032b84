//! Response decoder registry.
//!
//! The frame parser looks up the variant decoder for each inbound frame
//! by API id. The registry is an ordinary value owned by whoever owns
//! the parser, so applications can register decoders for vendor or
//! firmware extensions (or override a default) without touching this
//! crate. API ids with no entry decode to [`ResponseKind::Generic`].

use std::collections::HashMap;

use crate::constants::*;
use crate::error::FrameError;
use crate::response::{self, ResponseKind};

/// A variant decoder: frame-data payload (after the API id) in, typed
/// response kind out.
pub type ResponseDecoder = Box<dyn Fn(&[u8]) -> Result<ResponseKind, FrameError> + Send + Sync>;

/// Maps API ids to variant decoders.
pub struct ResponseRegistry {
    decoders: HashMap<u8, ResponseDecoder>,
}

impl ResponseRegistry {
    /// A registry with every standard response kind registered.
    pub fn with_defaults() -> Self {
        let mut registry = ResponseRegistry {
            decoders: HashMap::new(),
        };
        registry.register(API_AT_RESPONSE, Box::new(response::decode_at_response));
        registry.register(
            API_REMOTE_AT_RESPONSE,
            Box::new(response::decode_remote_at_response),
        );
        registry.register(API_MODEM_STATUS, Box::new(response::decode_modem_status));
        registry.register(API_TX_STATUS, Box::new(response::decode_tx_status));
        registry.register(API_ZB_TX_STATUS, Box::new(response::decode_zb_tx_status));
        registry.register(API_RX_64, Box::new(response::decode_rx_64));
        registry.register(API_RX_16, Box::new(response::decode_rx_16));
        registry.register(
            API_RX_64_IO_SAMPLE,
            Box::new(response::decode_rx_64_io_sample),
        );
        registry.register(
            API_RX_16_IO_SAMPLE,
            Box::new(response::decode_rx_16_io_sample),
        );
        registry.register(API_ZB_RX, Box::new(response::decode_zb_rx));
        registry.register(API_ZB_EXPLICIT_RX, Box::new(response::decode_zb_explicit_rx));
        registry.register(API_ZB_IO_SAMPLE, Box::new(response::decode_zb_io_sample));
        registry.register(
            API_NODE_IDENTIFICATION,
            Box::new(response::decode_node_identification),
        );
        registry
    }

    /// An empty registry; everything decodes as Generic.
    pub fn empty() -> Self {
        ResponseRegistry {
            decoders: HashMap::new(),
        }
    }

    /// Register (or override) the decoder for an API id.
    pub fn register(&mut self, api_id: u8, decoder: ResponseDecoder) {
        self.decoders.insert(api_id, decoder);
    }

    /// Remove the decoder for an API id; subsequent frames with that id
    /// decode as Generic.
    pub fn unregister(&mut self, api_id: u8) {
        self.decoders.remove(&api_id);
    }

    /// Decode a frame payload by API id, falling back to Generic.
    pub fn decode(&self, api_id: u8, payload: &[u8]) -> Result<ResponseKind, FrameError> {
        match self.decoders.get(&api_id) {
            Some(decoder) => decoder(payload),
            None => Ok(ResponseKind::Generic {
                payload: payload.to_vec(),
            }),
        }
    }
}

impl Default for ResponseRegistry {
    fn default() -> Self {
        ResponseRegistry::with_defaults()
    }
}

impl std::fmt::Debug for ResponseRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<u8> = self.decoders.keys().copied().collect();
        ids.sort_unstable();
        f.debug_struct("ResponseRegistry")
            .field("api_ids", &ids)
            .finish()
    }
}
