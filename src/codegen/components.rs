// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! Component code generators
//!
//! One generator per component kind. Each renders a Python class whose
//! optional blocks are switched on by dataset characteristics. Without
//! dataset information every class is still emitted, with pass-through
//! bodies.

use crate::codegen::python;
use crate::codegen::templates::network_class_name;
use crate::pipeline::identifier::class_name;
use crate::pipeline::{ComponentKind, DataCharacteristics, DatasetInfo, PipelineComponent, ProblemType};

/// Generate the class for one component.
///
/// Unknown kinds produce an empty string.
pub fn generate(component: &PipelineComponent, dataset: Option<&DatasetInfo>) -> String {
    match &component.kind {
        ComponentKind::Preprocessing => preprocessing(component, dataset),
        ComponentKind::Model => model(component, dataset),
        ComponentKind::Postprocessing => postprocessing(component, dataset),
        ComponentKind::Feature => single_method(component, dataset, &FEATURE),
        ComponentKind::Transformation => single_method(component, dataset, &TRANSFORMATION),
        ComponentKind::Monitoring => single_method(component, dataset, &MONITORING),
        ComponentKind::Explainability => single_method(component, dataset, &EXPLAINABILITY),
        ComponentKind::Unknown(_) => String::new(),
    }
}

/// Method the orchestrator calls to push data through a component
pub fn entry_method(kind: &ComponentKind) -> Option<&'static str> {
    match kind {
        ComponentKind::Preprocessing => Some("fit_transform"),
        ComponentKind::Model => Some("predict"),
        ComponentKind::Postprocessing => Some("process"),
        ComponentKind::Feature => Some("extract"),
        ComponentKind::Transformation => Some("transform"),
        ComponentKind::Monitoring => Some("monitor"),
        ComponentKind::Explainability => Some("explain"),
        ComponentKind::Unknown(_) => None,
    }
}

fn characteristics(dataset: Option<&DatasetInfo>) -> DataCharacteristics {
    dataset.map(|d| d.data_characteristics).unwrap_or_default()
}

fn docstring_summary(component: &PipelineComponent) -> String {
    let doc = python::docstring(&component.description);
    if doc.is_empty() {
        python::docstring(&component.name)
    } else {
        doc
    }
}

fn header_vars(component: &PipelineComponent) -> (String, String, String) {
    (
        class_name(&component.name),
        docstring_summary(component),
        python::string_literal(&component.name),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Preprocessing
// ─────────────────────────────────────────────────────────────────────────────

const PREPROCESSING_HEADER: &str = r#"class {{ class_name }}:
    """{{ doc }}

    Preprocessing component.
    """

    def __init__(self):
        self.logger = logging.getLogger(self.__class__.__name__)
        self.name = {{ label }}
"#;

const PREPROCESSING_METHODS: &str = r#"
    def fit(self, X, y=None):
        self._apply(X, fit=True)
        return self

    def transform(self, X):
        return self._apply(X, fit=False)

    def fit_transform(self, X, y=None):
        return self._apply(X, fit=True)

    def _apply(self, X, fit):
"#;

const PASS_THROUGH: &str = "        self.logger.debug('%s: pass-through', self.name)
        return X";

const IMPUTATION_INIT: &str =
    "        self.imputer = sk_SimpleImputer(strategy='most_frequent', keep_empty_features=True)\n";

const IMPUTATION: &str = r#"
        # Imputation
        if fit:
            self.imputer.fit(X)
        X = pd.DataFrame(self.imputer.transform(X), columns=X.columns, index=X.index).infer_objects()
"#;

const TEXT_INIT: &str = "        self.vectorizers = {}\n        self.text_columns = []\n";

const TEXT: &str = r#"
        # Text vectorization
        if fit:
            self.text_columns = [
                column
                for column in X.select_dtypes(include='object').columns
                if X[column].astype(str).str.len().mean() > 20
            ]
        for column in self.text_columns:
            texts = X.pop(column).astype(str)
            if fit:
                self.vectorizers[column] = sk_TfidfVectorizer(max_features=100)
                matrix = self.vectorizers[column].fit_transform(texts)
            else:
                matrix = self.vectorizers[column].transform(texts)
            names = [f'{column}_tfidf_{i}' for i in range(matrix.shape[1])]
            X = X.join(pd.DataFrame(matrix.toarray(), columns=names, index=X.index))
"#;

const SCALING_INIT: &str = "        self.scaler = sk_StandardScaler()\n        self.numeric_columns = []\n";

const SCALING: &str = r#"
        # Scaling
        if fit:
            self.numeric_columns = list(X.select_dtypes(include='number').columns)
            if self.numeric_columns:
                self.scaler.fit(X[self.numeric_columns])
        if self.numeric_columns:
            X[self.numeric_columns] = self.scaler.transform(X[self.numeric_columns])
"#;

const ENCODING_INIT: &str = "        self.encoder = sk_OneHotEncoder(handle_unknown='ignore', sparse_output=False)
        self.categorical_columns = []
";

const ENCODING: &str = r#"
        # One-hot encoding
        if fit:
            self.categorical_columns = list(X.select_dtypes(include=['object', 'category']).columns)
            if self.categorical_columns:
                self.encoder.fit(X[self.categorical_columns])
        if self.categorical_columns:
            encoded = self.encoder.transform(X[self.categorical_columns])
            names = self.encoder.get_feature_names_out(self.categorical_columns)
            X = X.drop(columns=self.categorical_columns).join(
                pd.DataFrame(encoded, columns=names, index=X.index)
            )
"#;

fn preprocessing(component: &PipelineComponent, dataset: Option<&DatasetInfo>) -> String {
    let (class, doc, label) = header_vars(component);
    let flags = characteristics(dataset);

    // Fixed block order: missing -> text -> numerical -> categorical
    let gates = [
        (flags.has_missing_values, IMPUTATION_INIT, IMPUTATION),
        (flags.has_text_features, TEXT_INIT, TEXT),
        (flags.has_numerical_features, SCALING_INIT, SCALING),
        (flags.has_categorical_features, ENCODING_INIT, ENCODING),
    ];

    let mut out = python::render(
        PREPROCESSING_HEADER,
        &[("class_name", class.as_str()), ("doc", doc.as_str()), ("label", label.as_str())],
    );

    for (_, init, _) in gates.iter().filter(|(on, _, _)| *on) {
        out.push_str(init);
    }

    out.push_str(PREPROCESSING_METHODS);

    if gates.iter().any(|(on, _, _)| *on) {
        out.push_str("        self.logger.info('Applying %s', self.name)\n");
        out.push_str("        X = pd.DataFrame(X).copy()\n");
        for (_, _, body) in gates.iter().filter(|(on, _, _)| *on) {
            out.push_str(body);
        }
        out.push_str("\n        return X");
    } else {
        out.push_str(PASS_THROUGH);
    }

    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Model
// ─────────────────────────────────────────────────────────────────────────────

const MODEL: &str = r#"class {{ class_name }}:
    """{{ doc }}

    Model component for {{ problem_type }} problems.
    """

    def __init__(self):
        self.logger = logging.getLogger(self.__class__.__name__)
        self.name = {{ label }}
        self.estimator = {{ estimator }}
        self.network = None

    def build_network(self, input_size, output_size=1):
        self.network = {{ network_class }}(input_size, output_size=output_size)
        return self.network

    def fit(self, X, y=None):
        self.logger.info('Fitting %s', self.name)
        self._require_estimator()
        self.estimator.fit(X, y)
        return self

    def predict(self, X):
        self._require_estimator()
        return self.estimator.predict(X)

    def predict_proba(self, X):
{{ predict_proba }}

    def score(self, X, y=None):
{{ score }}

    def _require_estimator(self):
        if self.estimator is None:
            raise NotImplementedError(
                'No estimator is configured for {{ problem_type }} problems; '
                'assign self.estimator or train the network from build_network()'
            )"#;

fn model(component: &PipelineComponent, dataset: Option<&DatasetInfo>) -> String {
    let (class, doc, label) = header_vars(component);
    let problem_type = component.effective_problem_type(dataset);

    let estimator = match problem_type {
        ProblemType::Classification => "sk_RandomForestClassifier(n_estimators=100, random_state=42)",
        ProblemType::Regression => "sk_RandomForestRegressor(n_estimators=100, random_state=42)",
        ProblemType::Clustering => "sk_KMeans(n_clusters=8, n_init=10, random_state=42)",
        ProblemType::Other => "None",
    };

    let predict_proba = match problem_type {
        ProblemType::Classification => {
            "        self._require_estimator()\n        return self.estimator.predict_proba(X)".to_string()
        }
        other => format!(
            "        raise NotImplementedError('predict_proba is not supported for {} problems')",
            other
        ),
    };

    let score = match problem_type {
        ProblemType::Classification => "        return sk_accuracy_score(y, self.predict(X))",
        ProblemType::Regression => {
            "        # Negated mean squared error, higher is better\n        return -sk_mean_squared_error(y, self.predict(X))"
        }
        ProblemType::Clustering => "        return sk_silhouette_score(X, self.predict(X))",
        ProblemType::Other => {
            "        raise NotImplementedError('No scoring metric is defined for other problems')"
        }
    };

    let problem = problem_type.to_string();
    let network = network_class_name(component);

    python::render(
        MODEL,
        &[
            ("class_name", class.as_str()),
            ("doc", doc.as_str()),
            ("label", label.as_str()),
            ("problem_type", problem.as_str()),
            ("estimator", estimator),
            ("network_class", network.as_str()),
            ("predict_proba", predict_proba.as_str()),
            ("score", score),
        ],
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Postprocessing
// ─────────────────────────────────────────────────────────────────────────────

const POSTPROCESSING: &str = r#"class {{ class_name }}:
    """{{ doc }}

    Postprocessing component.
    """

    def __init__(self):
        self.logger = logging.getLogger(self.__class__.__name__)
        self.name = {{ label }}

    def process(self, predictions):
{{ body }}"#;

fn postprocessing(component: &PipelineComponent, dataset: Option<&DatasetInfo>) -> String {
    let (class, doc, label) = header_vars(component);

    let body = match component.effective_problem_type(dataset) {
        ProblemType::Classification => {
            "        # Threshold scores into integer labels\n        return (np.asarray(predictions) >= 0.5).astype(int)"
        }
        ProblemType::Regression => {
            "        # Clip negative predictions to zero\n        return np.clip(np.asarray(predictions), 0, None)"
        }
        ProblemType::Clustering | ProblemType::Other => "        return predictions",
    };

    python::render(
        POSTPROCESSING,
        &[("class_name", class.as_str()), ("doc", doc.as_str()), ("label", label.as_str()), ("body", body)],
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Feature, transformation, monitoring, explainability
// ─────────────────────────────────────────────────────────────────────────────

/// An optional block: constructor lines plus method body
struct Gate {
    init: &'static str,
    body: &'static str,
}

/// Shape of a single-method component
struct SingleMethod {
    role: &'static str,
    method: &'static str,
    summary: &'static str,
    /// Constructor lines emitted regardless of gates
    base_init: &'static str,
    /// First body line when any gate is active
    prelude: &'static str,
    target: Gate,
    numerical: Gate,
    categorical: Gate,
}

const SINGLE_METHOD_HEADER: &str = r#"class {{ class_name }}:
    """{{ doc }}

    {{ role }} component.
    """

    def __init__(self):
        self.logger = logging.getLogger(self.__class__.__name__)
        self.name = {{ label }}
"#;

const SINGLE_METHOD_SIGNATURE: &str = r#"
    def {{ method }}(self, X):
        """{{ summary }}"""
        self.logger.debug('%s: {{ method }}', self.name)
"#;

const FEATURE: SingleMethod = SingleMethod {
    role: "Feature extraction",
    method: "extract",
    summary: "Derive model features from the input.",
    base_init: "",
    prelude: "        X = pd.DataFrame(X).copy()\n",
    target: Gate {
        init: "",
        body: r#"
        # Keep the target out of the feature set
        X = X.drop(columns=[{{ target }}], errors='ignore')
"#,
    },
    numerical: Gate {
        init: "        self.reducer = sk_PCA(n_components=0.95)\n        self.reducer_fitted = False\n",
        body: r#"
        # Reduce numerical features
        numeric = X.select_dtypes(include='number')
        if not numeric.empty:
            if not self.reducer_fitted:
                self.reducer.fit(numeric)
                self.reducer_fitted = True
            reduced = pd.DataFrame(self.reducer.transform(numeric), index=X.index).add_prefix('pc_')
            X = X.drop(columns=numeric.columns).join(reduced)
"#,
    },
    categorical: Gate {
        init: "",
        body: r#"
        # Frequency-encode categorical features
        for column in X.select_dtypes(include=['object', 'category']).columns:
            X[f'{column}_freq'] = X[column].map(X[column].value_counts(normalize=True))
"#,
    },
};

const TRANSFORMATION: SingleMethod = SingleMethod {
    role: "Transformation",
    method: "transform",
    summary: "Transform the input before it reaches the next component.",
    base_init: "",
    prelude: "        X = pd.DataFrame(X).copy()\n",
    target: Gate {
        init: "",
        body: r#"
        # Drop rows without a target value
        if {{ target }} in X.columns:
            X = X[X[{{ target }}].notna()]
"#,
    },
    numerical: Gate {
        init: "",
        body: r#"
        # Log-transform skewed non-negative numerical features
        numeric = X.select_dtypes(include='number')
        skewed = [c for c in numeric.columns if (numeric[c] >= 0).all() and abs(numeric[c].skew()) > 1]
        if skewed:
            X[skewed] = np.log1p(X[skewed])
"#,
    },
    categorical: Gate {
        init: "",
        body: r#"
        # Normalize categorical labels
        for column in X.select_dtypes(include=['object', 'category']).columns:
            X[column] = X[column].astype(str).str.strip().str.lower()
"#,
    },
};

const MONITORING: SingleMethod = SingleMethod {
    role: "Monitoring",
    method: "monitor",
    summary: "Record statistics about the data and pass it through unchanged.",
    base_init: "        self.batches = 0\n",
    prelude: "        self.batches += 1\n        frame = pd.DataFrame(X)\n",
    target: Gate {
        init: "",
        body: r#"
        # Track the target distribution
        if {{ target }} in frame.columns:
            self.logger.info('Target mean %.4f', frame[{{ target }}].mean())
"#,
    },
    numerical: Gate {
        init: "        self.reference = None\n        self.drift_threshold = 0.1\n",
        body: r#"
        # Track numerical drift against the first batch
        means = frame.select_dtypes(include='number').mean()
        if self.reference is None:
            self.reference = means
        elif not means.empty:
            drift = ((means - self.reference).abs() / (self.reference.abs() + 1e-9)).max()
            if drift > self.drift_threshold:
                self.logger.warning('Drift detected in batch %d: %.3f', self.batches, drift)
"#,
    },
    categorical: Gate {
        init: "        self.seen_categories = {}\n",
        body: r#"
        # Track unseen categories
        for column in frame.select_dtypes(include=['object', 'category']).columns:
            values = set(frame[column].dropna().unique())
            known = self.seen_categories.setdefault(column, values)
            unseen = values - known
            if unseen:
                self.logger.warning('Unseen categories in %s: %s', column, sorted(map(str, unseen)))
"#,
    },
};

const EXPLAINABILITY: SingleMethod = SingleMethod {
    role: "Explainability",
    method: "explain",
    summary: "Compute explanations for the data and pass it through unchanged.",
    base_init: "        self.importances = None\n",
    prelude: "        frame = pd.DataFrame(X)\n",
    target: Gate {
        init: "        self.target_column = {{ target }}\n        self.model = None\n        self.labels = None\n",
        body: r#"
        # Permutation importance once a fitted model and target labels are attached
        if self.model is not None and self.labels is not None:
            result = sk_permutation_importance(self.model, frame, self.labels, n_repeats=5, random_state=42)
            self.importances = pd.Series(result.importances_mean, index=frame.columns)
"#,
    },
    numerical: Gate {
        init: "",
        body: r#"
        # Rank numerical features by mean absolute value
        numeric = frame.select_dtypes(include='number')
        if not numeric.empty and self.importances is None:
            self.importances = numeric.abs().mean().sort_values(ascending=False)
            self.logger.info('Top features: %s', list(self.importances.index[:5]))
"#,
    },
    categorical: Gate {
        init: "",
        body: r#"
        # Report categorical cardinality
        for column in frame.select_dtypes(include=['object', 'category']).columns:
            self.logger.info('%s has %d categories', column, frame[column].nunique())
"#,
    },
};

fn single_method(
    component: &PipelineComponent,
    dataset: Option<&DatasetInfo>,
    shape: &SingleMethod,
) -> String {
    let (class, doc, label) = header_vars(component);
    let flags = characteristics(dataset);
    let target = dataset
        .and_then(|d| d.target_column.as_deref())
        .map(python::string_literal);

    let active: Vec<&Gate> = [
        (target.is_some(), &shape.target),
        (flags.has_numerical_features, &shape.numerical),
        (flags.has_categorical_features, &shape.categorical),
    ]
    .into_iter()
    .filter(|(on, _)| *on)
    .map(|(_, gate)| gate)
    .collect();

    let target_literal = target.unwrap_or_default();
    let vars = [("target", target_literal.as_str())];

    let mut out = python::render(
        SINGLE_METHOD_HEADER,
        &[
            ("class_name", class.as_str()),
            ("doc", doc.as_str()),
            ("label", label.as_str()),
            ("role", shape.role),
        ],
    );

    out.push_str(shape.base_init);
    for gate in &active {
        out.push_str(&python::render(gate.init, &vars));
    }

    out.push_str(&python::render(
        SINGLE_METHOD_SIGNATURE,
        &[("method", shape.method), ("summary", shape.summary)],
    ));

    if !active.is_empty() {
        out.push_str(shape.prelude);
        for gate in &active {
            out.push_str(&python::render(gate.body, &vars));
        }
        out.push('\n');
    }

    out.push_str("        return X");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(flags: DataCharacteristics, target: Option<&str>, problem_type: ProblemType) -> DatasetInfo {
        DatasetInfo {
            name: "sensors".into(),
            data_type: "csv".into(),
            size: 500,
            columns: None,
            target_column: target.map(String::from),
            problem_type,
            data_characteristics: flags,
        }
    }

    fn component(kind: ComponentKind) -> PipelineComponent {
        PipelineComponent::new("c", "Test Component", kind, "Does a thing.")
    }

    #[test]
    fn test_preprocessing_without_dataset_passes_through() {
        let code = generate(&component(ComponentKind::Preprocessing), None);
        assert!(code.contains("class TestComponent:"));
        assert!(code.contains("def fit(self, X, y=None):"));
        assert!(code.contains("def transform(self, X):"));
        assert!(code.contains("def fit_transform(self, X, y=None):"));
        assert!(code.contains("pass-through"));
        assert!(!code.contains("# Imputation"));
        assert!(!code.contains("# Scaling"));
    }

    #[test]
    fn test_preprocessing_block_order() {
        let flags = DataCharacteristics {
            has_missing_values: true,
            has_categorical_features: true,
            has_numerical_features: true,
            has_text_features: true,
            has_image_features: false,
        };
        let ds = dataset(flags, None, ProblemType::Other);
        let code = generate(&component(ComponentKind::Preprocessing), Some(&ds));

        let positions: Vec<usize> = ["# Imputation", "# Text vectorization", "# Scaling", "# One-hot encoding"]
            .iter()
            .map(|m| code.find(m).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
        assert!(!code.contains("pass-through"));
    }

    #[test]
    fn test_model_classification() {
        let ds = dataset(DataCharacteristics::default(), None, ProblemType::Classification);
        let code = generate(&component(ComponentKind::Model), Some(&ds));

        assert!(code.contains("sk_RandomForestClassifier"));
        assert!(code.contains("return sk_accuracy_score(y, self.predict(X))"));
        assert!(code.contains("return self.estimator.predict_proba(X)"));
        assert!(!code.contains("predict_proba is not supported"));
        assert!(code.contains("TestComponentNetwork(input_size, output_size=output_size)"));
    }

    #[test]
    fn test_model_other_has_no_estimator() {
        let code = generate(&component(ComponentKind::Model), None);
        assert!(code.contains("self.estimator = None"));
        assert!(code.contains("predict_proba is not supported for other problems"));
        assert!(code.contains("No scoring metric"));
    }

    #[test]
    fn test_model_component_hint_overrides_dataset() {
        let ds = dataset(DataCharacteristics::default(), None, ProblemType::Classification);
        let c = component(ComponentKind::Model).with_problem_type(ProblemType::Clustering);
        let code = generate(&c, Some(&ds));
        assert!(code.contains("sk_KMeans"));
        assert!(code.contains("sk_silhouette_score(X, self.predict(X))"));
    }

    #[test]
    fn test_postprocessing_branches() {
        let cases = [
            (ProblemType::Classification, ">= 0.5).astype(int)"),
            (ProblemType::Regression, "np.clip(np.asarray(predictions), 0, None)"),
            (ProblemType::Clustering, "        return predictions"),
            (ProblemType::Other, "        return predictions"),
        ];

        for (problem_type, expected) in cases {
            let ds = dataset(DataCharacteristics::default(), None, problem_type);
            let code = generate(&component(ComponentKind::Postprocessing), Some(&ds));
            assert!(code.contains("def process(self, predictions):"));
            assert!(code.contains(expected), "{}", problem_type);
        }
    }

    #[test]
    fn test_single_method_gates() {
        let flags = DataCharacteristics {
            has_numerical_features: true,
            ..Default::default()
        };
        let ds = dataset(flags, Some("label"), ProblemType::Regression);

        let code = generate(&component(ComponentKind::Feature), Some(&ds));
        assert!(code.contains("def extract(self, X):"));
        assert!(code.contains("# Reduce numerical features"));
        assert!(code.contains("X.drop(columns=['label'], errors='ignore')"));
        assert!(!code.contains("# Frequency-encode categorical features"));

        let bare = generate(&component(ComponentKind::Feature), None);
        assert!(!bare.contains("# Reduce numerical features"));
        assert!(bare.trim_end().ends_with("return X"));
    }

    #[test]
    fn test_entry_methods() {
        assert_eq!(entry_method(&ComponentKind::Monitoring), Some("monitor"));
        assert_eq!(entry_method(&ComponentKind::Explainability), Some("explain"));
        assert_eq!(entry_method(&ComponentKind::Unknown("x".into())), None);
    }

    #[test]
    fn test_unknown_kind_is_empty() {
        assert_eq!(generate(&component(ComponentKind::Unknown("quantum".into())), None), "");
    }

    #[test]
    fn test_user_text_is_escaped() {
        let c = PipelineComponent::new(
            "c",
            "Evil's Scaler",
            ComponentKind::Preprocessing,
            r#"Ends with """ and a backslash \"#,
        );
        let code = generate(&c, None);
        assert!(code.contains(r"self.name = 'Evil\'s Scaler'"));
        assert!(code.contains(r#"\"\"\""#));
    }
}
