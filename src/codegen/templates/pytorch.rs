// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! PyTorch template

use super::{render_network, FrameworkTemplate};
use crate::codegen::Framework;
use crate::pipeline::PipelineComponent;

/// PyTorch code fragments
pub struct PyTorchTemplate;

const IMPORTS: &[&str] = &[
    "import torch",
    "import torch.nn as nn",
    "import torch.optim as optim",
    "from torch.utils.data import DataLoader",
];

const NETWORK: &str = r#"class {{ class_name }}(nn.Module):
    """{{ summary }}

    {{ framework }} network: two hidden layers with dropout.
    """

    def __init__(self, input_size: int, hidden_size: int = 128, output_size: int = 1):
        super().__init__()
        self.layers = nn.Sequential(
            nn.Linear(input_size, hidden_size),
            nn.ReLU(),
            nn.Dropout(0.2),
            nn.Linear(hidden_size, hidden_size // 2),
            nn.ReLU(),
            nn.Linear(hidden_size // 2, output_size),
        )
        self.apply(self._init_weights)

    def _init_weights(self, module):
        if isinstance(module, nn.Linear):
            nn.init.xavier_uniform_(module.weight)
            if module.bias is not None:
                nn.init.zeros_(module.bias)

    def forward(self, x: torch.Tensor) -> torch.Tensor:
        return self.layers(x)

    def training_step(self, batch) -> torch.Tensor:
        x, y = batch
        return nn.functional.mse_loss(self(x), y)"#;

const TRAINING_LOOP: &str = r#"def train_model(
    model: nn.Module,
    train_loader: DataLoader,
    val_loader: DataLoader,
    epochs: int = 10,
    learning_rate: float = 0.001,
) -> nn.Module:
    """Train a PyTorch network with Adam and report the validation loss per epoch."""
    optimizer = optim.Adam(model.parameters(), lr=learning_rate)
    criterion = nn.MSELoss()

    for epoch in range(epochs):
        model.train()
        train_loss = 0.0
        for batch in train_loader:
            optimizer.zero_grad()
            loss = model.training_step(batch)
            loss.backward()
            optimizer.step()
            train_loss += loss.item()

        model.eval()
        val_loss = 0.0
        with torch.no_grad():
            for x, y in val_loader:
                val_loss += criterion(model(x), y).item()

        logger.info(
            'Epoch %d/%d: train loss %.4f, validation loss %.4f',
            epoch + 1,
            epochs,
            train_loss / max(len(train_loader), 1),
            val_loss / max(len(val_loader), 1),
        )

    return model"#;

impl FrameworkTemplate for PyTorchTemplate {
    fn framework(&self) -> Framework {
        Framework::PyTorch
    }

    fn imports(&self) -> &'static [&'static str] {
        IMPORTS
    }

    fn model_class(&self, component: &PipelineComponent) -> String {
        render_network(NETWORK, component, "PyTorch")
    }

    fn training_loop(&self) -> String {
        TRAINING_LOOP.to_string()
    }
}
