// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! TensorFlow / Keras template
//!
//! Keras is reached through the `keras` module name only, so component
//! classes called `Model` or `layers` cannot shadow it.

use super::{render_network, FrameworkTemplate};
use crate::codegen::Framework;
use crate::pipeline::PipelineComponent;

/// TensorFlow code fragments
pub struct TensorFlowTemplate;

const IMPORTS: &[&str] = &[
    "import tensorflow as tf",
    "from tensorflow import keras",
];

const NETWORK: &str = r#"class {{ class_name }}(keras.Model):
    """{{ summary }}

    {{ framework }} network: two hidden layers with dropout.
    """

    def __init__(self, input_size: int, hidden_size: int = 128, output_size: int = 1):
        super().__init__()
        self.input_size = input_size
        self.hidden = [
            keras.layers.Dense(hidden_size, activation='relu'),
            keras.layers.Dropout(0.2),
            keras.layers.Dense(hidden_size // 2, activation='relu'),
        ]
        self.head = keras.layers.Dense(output_size)
        self.compile(
            optimizer=keras.optimizers.Adam(learning_rate=0.001),
            loss='mse',
            metrics=['mae'],
        )

    def call(self, inputs, training=False):
        x = inputs
        for layer in self.hidden:
            x = layer(x, training=training)
        return self.head(x)"#;

const TRAINING_LOOP: &str = r#"def train_model(
    model: keras.Model,
    train_dataset: tf.data.Dataset,
    val_dataset: tf.data.Dataset,
    epochs: int = 10,
    checkpoint_path: str = 'checkpoints/model.keras',
):
    """Train a Keras network with early stopping and checkpointing."""
    callbacks = [
        keras.callbacks.EarlyStopping(
            monitor='val_loss',
            patience=5,
            restore_best_weights=True,
        ),
        keras.callbacks.ModelCheckpoint(
            filepath=checkpoint_path,
            monitor='val_loss',
            save_best_only=True,
        ),
    ]

    history = model.fit(
        train_dataset,
        validation_data=val_dataset,
        epochs=epochs,
        callbacks=callbacks,
        verbose=1,
    )

    return model, history"#;

impl FrameworkTemplate for TensorFlowTemplate {
    fn framework(&self) -> Framework {
        Framework::TensorFlow
    }

    fn imports(&self) -> &'static [&'static str] {
        IMPORTS
    }

    fn model_class(&self, component: &PipelineComponent) -> String {
        render_network(NETWORK, component, "TensorFlow")
    }

    fn training_loop(&self) -> String {
        TRAINING_LOOP.to_string()
    }
}
