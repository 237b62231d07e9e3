// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! Deployment recommendation engine
//!
//! Maps workload signals to a short ranked list of hardware and platforms.

use super::Signals;

/// A hardware suggestion
#[derive(Debug, Clone, PartialEq)]
pub struct Hardware {
    pub name: &'static str,
    pub description: &'static str,
    /// Indicative on-demand price in USD per hour
    pub hourly_cost: f64,
}

/// A hosting platform suggestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub name: &'static str,
    pub reason: &'static str,
}

/// Recommendation with rationale
#[derive(Debug, Clone)]
pub struct Recommendation {
    /// Hardware, best fit first
    pub hardware: Vec<Hardware>,
    /// Platforms, best fit first
    pub platforms: Vec<Platform>,
    /// Why these were picked
    pub rationale: Vec<String>,
}

const A100: Hardware = Hardware {
    name: "NVIDIA A100",
    description: "80GB GPU for large model training and inference",
    hourly_cost: 2.50,
};

const A10G: Hardware = Hardware {
    name: "NVIDIA A10G",
    description: "24GB GPU for training and vision workloads",
    hourly_cost: 0.60,
};

const CPU: Hardware = Hardware {
    name: "High-Performance CPU",
    description: "Multi-core CPU instance for classical ML and inference",
    hourly_cost: 0.10,
};

const BREV: Platform = Platform {
    name: "Brev.dev",
    reason: "GPU instances with preconfigured ML environments",
};

const HUGGING_FACE: Platform = Platform {
    name: "Hugging Face",
    reason: "Model hosting and inference endpoints",
};

const COLAB: Platform = Platform {
    name: "Google Colab",
    reason: "Free GPU notebooks for experimenting with training",
};

/// Recommend hardware and platforms for a set of signals
pub fn recommend(signals: &Signals) -> Recommendation {
    let mut rationale = Vec::new();

    let hardware = if signals.uses_large_models {
        rationale.push("Large models need high-memory GPUs".to_string());
        vec![A100, A10G]
    } else if signals.requires_training || signals.computer_vision || signals.latency_bound {
        if signals.requires_training {
            rationale.push("Training benefits from GPU acceleration".to_string());
        }
        if signals.computer_vision {
            rationale.push("Vision workloads are GPU-bound".to_string());
        }
        if signals.latency_bound {
            rationale.push("Latency estimate above 100 ms needs GPU inference".to_string());
        }
        vec![A10G, CPU]
    } else {
        rationale.push("No GPU-bound workload detected".to_string());
        vec![CPU]
    };

    let mut platforms = vec![BREV, HUGGING_FACE];
    if signals.requires_training {
        platforms.push(COLAB);
    }

    Recommendation {
        hardware,
        platforms,
        rationale,
    }
}
