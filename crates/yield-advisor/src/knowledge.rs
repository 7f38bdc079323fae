//! DeFi Knowledge Base
//!
//! Reference document of supported protocols, chains and risk factor
//! descriptions. Loaded once when the advisor is built; an in-code default
//! stands in when the file is absent.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AdvisorError, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    #[serde(default)]
    pub protocols: Vec<String>,

    #[serde(default)]
    pub chains: Vec<String>,

    /// Risk factor name -> description
    #[serde(default)]
    pub risk_factors: BTreeMap<String, String>,

    /// Any other sections of the document, kept as-is
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| (*s).to_string()).collect::<Vec<_>>();

        Self {
            protocols: strings(&[
                "Aave V3", "Compound V3", "Liquity V2", "MakerDAO", "Uniswap V3", "Curve",
                "Balancer", "Pendle", "GMX", "Vertex", "Drift", "Jupiter",
            ]),
            chains: strings(&["Ethereum", "Arbitrum", "Optimism", "Base", "Polygon", "Avalanche", "Solana"]),
            risk_factors: [
                ("smart_contract", "Code vulnerabilities and exploits"),
                ("impermanent_loss", "Price divergence in LP positions"),
                ("liquidation", "Collateral liquidation in leveraged positions"),
                ("bridge", "Cross-chain bridge risks"),
                ("oracle", "Price oracle manipulation"),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
            extra: BTreeMap::new(),
        }
    }
}

impl KnowledgeBase {
    /// Parse a knowledge base document
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| AdvisorError::KnowledgeBase(format!("{}: {}", path.display(), e)))
    }

    /// Load the document, or the built-in default when it is missing or invalid
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(kb) => {
                tracing::info!(
                    "Loaded knowledge base from {} ({} protocols, {} chains)",
                    path.display(),
                    kb.protocols.len(),
                    kb.chains.len()
                );
                kb
            }
            Err(AdvisorError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No knowledge base at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Ignoring knowledge base: {}", e);
                Self::default()
            }
        }
    }

    /// Risk factors as a markdown list, for prompt context
    pub fn risk_summary(&self) -> String {
        self.risk_factors
            .iter()
            .map(|(name, description)| format!("- {}: {}", name.replace('_', " "), description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
