//! CART regression tree.
//!
//! Splits minimise the summed squared error of the two children. Thresholds
//! sit halfway between adjacent distinct feature values and rows with
//! `x <= threshold` go left. Leaves predict the mean target of their rows.

use ndarray::{ArrayView1, ArrayView2};
use rand::Rng;
use rand::seq::index::sample;

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeParams {
    /// Maximum depth (root is depth 0)
    pub max_depth: usize,
    /// Minimum rows a node needs to be split
    pub min_samples_split: usize,
    /// Minimum rows in each child
    pub min_samples_leaf: usize,
    /// Features considered at each split
    pub max_features: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A fitted regression tree stored as a node arena.
#[derive(Debug, Clone)]
pub struct RegressionTree {
    nodes: Vec<Node>,
    n_features: usize,
}

#[derive(Debug, Clone, Copy)]
struct BestSplit {
    feature: usize,
    threshold: f64,
    sse: f64,
}

impl RegressionTree {
    /// Fit on the given rows of `x`/`y` (rows may repeat, as in a bootstrap sample).
    ///
    /// `rows` must be non-empty and index into `x` and `y`.
    pub fn fit<'a, R: Rng + ?Sized>(
        x: ArrayView2<'a, f64>,
        y: ArrayView1<'a, f64>,
        rows: &[usize],
        params: &'a TreeParams,
        rng: &mut R,
    ) -> Self {
        let mut builder = Builder {
            x,
            y,
            params,
            nodes: Vec::new(),
        };
        let mut rows = rows.to_vec();
        builder.grow(&mut rows, 0, rng);

        Self {
            nodes: builder.nodes,
            n_features: x.ncols(),
        }
    }

    /// Number of features the tree was fit on.
    pub const fn n_features(&self) -> usize {
        self.n_features
    }

    /// Number of nodes, leaves included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth of the deepest leaf.
    pub fn depth(&self) -> usize {
        self.depth_from(0)
    }

    /// Predict one row.
    pub fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes[index] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if row[feature] <= threshold { left } else { right };
                }
            }
        }
    }

    fn depth_from(&self, index: usize) -> usize {
        match self.nodes[index] {
            Node::Leaf { .. } => 0,
            Node::Split { left, right, .. } => {
                1 + self.depth_from(left).max(self.depth_from(right))
            }
        }
    }
}

struct Builder<'a> {
    x: ArrayView2<'a, f64>,
    y: ArrayView1<'a, f64>,
    params: &'a TreeParams,
    nodes: Vec<Node>,
}

impl Builder<'_> {
    /// Grow the subtree for `rows`, returning its node index.
    fn grow<R: Rng + ?Sized>(&mut self, rows: &mut [usize], depth: usize, rng: &mut R) -> usize {
        let index = self.nodes.len();
        let n = rows.len() as f64;
        let (sum, sum_sq) = rows.iter().fold((0.0, 0.0), |(s, sq), &r| {
            let v = self.y[r];
            (s + v, sq + v * v)
        });
        let mean = sum / n;
        self.nodes.push(Node::Leaf { value: mean });

        let parent_sse = sum_sq - sum * sum / n;
        let splittable = depth < self.params.max_depth
            && rows.len() >= self.params.min_samples_split
            && rows.len() >= 2 * self.params.min_samples_leaf
            && parent_sse > f64::EPSILON * sum_sq.max(1.0);
        if !splittable {
            return index;
        }

        let Some(best) = self.best_split(rows, rng) else {
            return index;
        };

        // partition in place: left rows first
        let mut boundary = 0;
        for i in 0..rows.len() {
            if self.x[[rows[i], best.feature]] <= best.threshold {
                rows.swap(i, boundary);
                boundary += 1;
            }
        }
        let (left_rows, right_rows) = rows.split_at_mut(boundary);

        let left = self.grow(left_rows, depth + 1, rng);
        let right = self.grow(right_rows, depth + 1, rng);
        self.nodes[index] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        };
        index
    }

    fn best_split<R: Rng + ?Sized>(&self, rows: &[usize], rng: &mut R) -> Option<BestSplit> {
        let n_features = self.x.ncols();
        let candidates: Vec<usize> = if self.params.max_features >= n_features {
            (0..n_features).collect()
        } else {
            sample(rng, n_features, self.params.max_features.max(1)).into_vec()
        };

        let min_leaf = self.params.min_samples_leaf.max(1);
        let n = rows.len();
        let mut best: Option<BestSplit> = None;
        let mut sorted: Vec<(f64, f64)> = Vec::with_capacity(n);

        for feature in candidates {
            sorted.clear();
            sorted.extend(rows.iter().map(|&r| (self.x[[r, feature]], self.y[r])));
            sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

            let (total, total_sq) = sorted
                .iter()
                .fold((0.0, 0.0), |(s, sq), &(_, v)| (s + v, sq + v * v));

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for i in 1..n {
                let (prev_x, prev_y) = sorted[i - 1];
                left_sum += prev_y;
                left_sq += prev_y * prev_y;

                let next_x = sorted[i].0;
                if i < min_leaf || n - i < min_leaf || prev_x >= next_x {
                    continue;
                }

                let nl = i as f64;
                let nr = (n - i) as f64;
                let right_sum = total - left_sum;
                let right_sq = total_sq - left_sq;
                let sse = (left_sq - left_sum * left_sum / nl) + (right_sq - right_sum * right_sum / nr);

                if best.is_none_or(|b| sse < b.sse) {
                    let mut threshold = prev_x + (next_x - prev_x) / 2.0;
                    if threshold >= next_x {
                        threshold = prev_x;
                    }
                    best = Some(BestSplit {
                        feature,
                        threshold,
                        sse,
                    });
                }
            }
        }

        best
    }
}
