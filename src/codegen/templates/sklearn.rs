// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! scikit-learn template

use super::{render_network, FrameworkTemplate};
use crate::codegen::Framework;
use crate::pipeline::PipelineComponent;

/// scikit-learn code fragments
pub struct SklearnTemplate;

const IMPORTS: &[&str] = &[
    "from sklearn.base import BaseEstimator as sk_BaseEstimator",
    "from sklearn.model_selection import cross_val_score as sk_cross_val_score",
    "from sklearn.model_selection import train_test_split as sk_train_test_split",
    "from sklearn.neural_network import MLPRegressor as sk_MLPRegressor",
];

const NETWORK: &str = r#"class {{ class_name }}(sk_BaseEstimator):
    """{{ summary }}

    {{ framework }} network: a multi-layer perceptron with two hidden layers.
    """

    def __init__(self, input_size: int = None, hidden_size: int = 128, output_size: int = 1):
        self.input_size = input_size
        self.hidden_size = hidden_size
        self.output_size = output_size
        self.model = sk_MLPRegressor(
            hidden_layer_sizes=(hidden_size, hidden_size // 2),
            max_iter=500,
            random_state=42,
        )

    def fit(self, X, y):
        self.model.fit(X, y)
        return self

    def predict(self, X):
        return self.model.predict(X)"#;

const TRAINING_LOOP: &str = r#"def train_model(
    model,
    X,
    y,
    test_size: float = 0.2,
    random_state: int = 42,
):
    """Train a scikit-learn estimator on a holdout split and cross-validate it."""
    X_train, X_test, y_train, y_test = sk_train_test_split(
        X,
        y,
        test_size=test_size,
        random_state=random_state,
    )

    model.fit(X_train, y_train)
    y_pred = model.predict(X_test)

    metrics = {
        'mse': sk_mean_squared_error(y_test, y_pred),
        'cv_score': sk_cross_val_score(
            model,
            X,
            y,
            cv=5,
            scoring='neg_mean_squared_error',
        ).mean(),
    }
    logger.info('Holdout MSE %.4f', metrics['mse'])

    return model, metrics"#;

impl FrameworkTemplate for SklearnTemplate {
    fn framework(&self) -> Framework {
        Framework::Sklearn
    }

    fn imports(&self) -> &'static [&'static str] {
        IMPORTS
    }

    fn model_class(&self, component: &PipelineComponent) -> String {
        render_network(NETWORK, component, "scikit-learn")
    }

    fn training_loop(&self) -> String {
        TRAINING_LOOP.to_string()
    }
}
