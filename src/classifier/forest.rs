use crate::artifact::{ClassifierModel, DecisionTree, TreeNode};
use crate::error::{FeedbackError, Result};

/// Validated decision-tree ensemble.
///
/// Every tree votes with the normalized class distribution of the leaf the
/// sample lands in; the ensemble picks the first class with the highest mean
/// probability.
#[derive(Debug, Clone)]
pub struct Forest {
    n_features: usize,
    feature_names: Vec<String>,
    classes: Vec<i64>,
    trees: Vec<Tree>,
}

#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        proba: Vec<f64>,
    },
}

impl Forest {
    pub fn from_artifact(model: ClassifierModel) -> Result<Self> {
        let n_features = model.n_features as usize;
        if n_features == 0 {
            return Err(config_err("model declares zero input features"));
        }
        if !model.feature_names.is_empty() && model.feature_names.len() != n_features {
            return Err(config_err(format!(
                "model lists {} feature names for {} features",
                model.feature_names.len(),
                n_features
            )));
        }
        if model.classes.is_empty() {
            return Err(config_err("model has no classes"));
        }
        if model.trees.is_empty() {
            return Err(config_err("model has no trees"));
        }

        let n_classes = model.classes.len();
        let trees = model
            .trees
            .into_iter()
            .enumerate()
            .map(|(i, tree)| {
                Tree::from_artifact(tree, n_features, n_classes)
                    .map_err(|e| config_err(format!("tree {i}: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            n_features,
            feature_names: model.feature_names,
            classes: model.classes,
            trees,
        })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn classes(&self) -> &[i64] {
        &self.classes
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Mean class distribution over all trees, indexed like [`Self::classes`].
    pub fn predict_proba(&self, x: &[f64]) -> Result<Vec<f64>> {
        if x.len() != self.n_features {
            return Err(FeedbackError::Inference(format!(
                "expected {} features, got {}",
                self.n_features,
                x.len()
            )));
        }
        if let Some(pos) = x.iter().position(|v| !v.is_finite()) {
            return Err(FeedbackError::Inference(format!(
                "feature {pos} is not a finite number"
            )));
        }

        let mut total = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            for (acc, p) in total.iter_mut().zip(tree.leaf_for(x)) {
                *acc += p;
            }
        }
        let n = self.trees.len() as f64;
        total.iter_mut().for_each(|p| *p /= n);
        Ok(total)
    }

    /// Raw categorical code of the most probable class.
    pub fn predict_code(&self, x: &[f64]) -> Result<i64> {
        let proba = self.predict_proba(x)?;
        let mut best = 0;
        for (idx, p) in proba.iter().enumerate().skip(1) {
            if *p > proba[best] {
                best = idx;
            }
        }
        Ok(self.classes[best])
    }
}

impl Tree {
    fn from_artifact(
        tree: DecisionTree,
        n_features: usize,
        n_classes: usize,
    ) -> std::result::Result<Self, String> {
        if tree.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        let n_nodes = tree.nodes.len();
        let nodes = tree
            .nodes
            .into_iter()
            .enumerate()
            .map(|(idx, node)| Node::from_artifact(idx, node, n_nodes, n_features, n_classes))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { nodes })
    }

    fn leaf_for(&self, x: &[f64]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { proba } => return proba,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

impl Node {
    fn from_artifact(
        idx: usize,
        node: TreeNode,
        n_nodes: usize,
        n_features: usize,
        n_classes: usize,
    ) -> std::result::Result<Self, String> {
        if node.feature < 0 {
            if node.value.len() != n_classes {
                return Err(format!(
                    "leaf {idx} has {} class weights, expected {n_classes}",
                    node.value.len()
                ));
            }
            if node.value.iter().any(|w| !w.is_finite() || *w < 0.0) {
                return Err(format!("leaf {idx} has a negative or non-finite weight"));
            }
            let sum: f64 = node.value.iter().sum();
            if sum <= 0.0 {
                return Err(format!("leaf {idx} has no class weight"));
            }
            return Ok(Node::Leaf {
                proba: node.value.iter().map(|w| w / sum).collect(),
            });
        }

        let feature = node.feature as usize;
        if feature >= n_features {
            return Err(format!(
                "node {idx} splits on feature {feature}, model has {n_features}"
            ));
        }
        if !node.threshold.is_finite() {
            return Err(format!("node {idx} has a non-finite threshold"));
        }
        let (left, right) = (node.left as usize, node.right as usize);
        for child in [left, right] {
            if child <= idx || child >= n_nodes {
                return Err(format!("node {idx} points at invalid child {child}"));
            }
        }
        Ok(Node::Split {
            feature,
            threshold: node.threshold,
            left,
            right,
        })
    }
}

fn config_err(msg: impl Into<String>) -> FeedbackError {
    FeedbackError::Configuration(msg.into())
}
