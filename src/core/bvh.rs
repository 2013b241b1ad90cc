// Copyright @yucwang 2026

use crate::math::aabb::AABB;
use crate::math::constants::{ Float, Point3f };
use crate::math::ray::Ray3f;

const MAX_LEAF_SIZE: usize = 4;
// Keeps hits on a box face from being culled by rounding in the slab test.
const BOUNDS_PADDING: Float = 1e-9;

#[derive(Clone)]
struct BVHNode {
    bounds: AABB,
    left: Option<usize>,
    right: Option<usize>,
    start: usize,
    count: usize,
}

impl BVHNode {
    fn leaf(bounds: AABB, start: usize, count: usize) -> Self {
        Self { bounds, left: None, right: None, start, count }
    }

    fn interior(bounds: AABB, left: usize, right: usize) -> Self {
        Self { bounds, left: Some(left), right: Some(right), start: 0, count: 0 }
    }

    fn is_leaf(&self) -> bool {
        self.left.is_none()
    }
}

struct SplitCandidate {
    cost: Float,
    axis: usize,
    split: usize,
}

/// Flat-arena bounding volume hierarchy over primitive boxes. Primitive
/// intersection is delegated to the caller.
pub struct BVH {
    nodes: Vec<BVHNode>,
    indices: Vec<usize>,
    prim_bounds: Vec<AABB>,
    prim_centroids: Vec<Point3f>,
}

impl BVH {
    pub fn new(prim_bounds: Vec<AABB>) -> Self {
        let prim_bounds: Vec<AABB> = prim_bounds.iter().map(|b| b.padded(BOUNDS_PADDING)).collect();
        let prim_centroids = prim_bounds.iter().map(|b| b.center()).collect();
        let mut bvh = Self {
            indices: (0..prim_bounds.len()).collect(),
            nodes: Vec::new(),
            prim_bounds,
            prim_centroids,
        };

        if !bvh.indices.is_empty() {
            bvh.nodes.reserve(2 * bvh.indices.len());
            bvh.build(0, bvh.indices.len());
        }

        bvh
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    pub fn depth(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }
        let mut max_depth = 0;
        let mut stack = vec![(0usize, 1usize)];
        while let Some((node_idx, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            let node = &self.nodes[node_idx];
            if let (Some(left), Some(right)) = (node.left, node.right) {
                stack.push((left, depth + 1));
                stack.push((right, depth + 1));
            }
        }
        max_depth
    }

    /// Closest hit `(primitive index, t)` among the primitives whose `hit_fn`
    /// reports a parameter. Matches a linear scan over all primitives.
    pub fn ray_intersection<F>(&self, ray: &Ray3f, mut hit_fn: F) -> Option<(usize, Float)>
    where
        F: FnMut(usize, &Ray3f) -> Option<Float>,
    {
        let root = self.nodes.first()?;
        let (root_near, _) = root.bounds.ray_intersect_range(ray)?;

        let mut closest: Option<(usize, Float)> = None;
        let mut closest_t = Float::INFINITY;
        let mut stack = vec![(0usize, root_near)];

        while let Some((node_idx, t_near)) = stack.pop() {
            if t_near > closest_t {
                continue;
            }

            let node = &self.nodes[node_idx];
            if node.is_leaf() {
                for &prim_idx in &self.indices[node.start..node.start + node.count] {
                    if let Some(t) = hit_fn(prim_idx, ray) {
                        if t < closest_t {
                            closest_t = t;
                            closest = Some((prim_idx, t));
                        }
                    }
                }
                continue;
            }

            let mut children = [node.left, node.right].map(|child| {
                child.and_then(|c| {
                    self.nodes[c].bounds.ray_intersect_range(ray).map(|(near, _)| (c, near))
                })
            });
            // Nearer child on top of the stack.
            if let [Some(a), Some(b)] = children {
                if a.1 < b.1 {
                    children = [Some(b), Some(a)];
                }
            }
            for child in children.into_iter().flatten() {
                stack.push(child);
            }
        }

        closest
    }

    fn build(&mut self, start: usize, end: usize) -> usize {
        let bounds = self.range_bounds(start, end);
        let count = end - start;

        if count <= MAX_LEAF_SIZE {
            let node_idx = self.nodes.len();
            self.nodes.push(BVHNode::leaf(bounds, start, count));
            return node_idx;
        }

        let leaf_cost = bounds.surface_area() * count as Float;
        let best = self.find_split(start, end);
        let best = match best {
            Some(best) if best.cost < leaf_cost => best,
            _ => {
                let node_idx = self.nodes.len();
                self.nodes.push(BVHNode::leaf(bounds, start, count));
                return node_idx;
            }
        };

        self.sort_range(start, end, best.axis);
        let mid = start + best.split;

        let node_idx = self.nodes.len();
        self.nodes.push(BVHNode::leaf(bounds, start, count));
        let left = self.build(start, mid);
        let right = self.build(mid, end);
        let merged = self.nodes[left].bounds.union(&self.nodes[right].bounds);
        self.nodes[node_idx] = BVHNode::interior(merged, left, right);
        node_idx
    }

    /// Sweeps every split position on X, Y and Z. Ties keep the first found.
    fn find_split(&self, start: usize, end: usize) -> Option<SplitCandidate> {
        let count = end - start;
        let mut best: Option<SplitCandidate> = None;
        let mut right_area = vec![0.0; count];

        for axis in 0..3 {
            let mut order = self.indices[start..end].to_vec();
            order.sort_by(|a, b| {
                self.prim_centroids[*a][axis].total_cmp(&self.prim_centroids[*b][axis])
            });

            let mut acc = self.prim_bounds[order[count - 1]];
            for i in (1..count).rev() {
                acc.expand_by_aabb(&self.prim_bounds[order[i]]);
                right_area[i] = acc.surface_area();
            }

            let mut left = self.prim_bounds[order[0]];
            for i in 1..count {
                let cost = left.surface_area() * i as Float
                    + right_area[i] * (count - i) as Float;
                if best.as_ref().map_or(true, |b| cost < b.cost) {
                    best = Some(SplitCandidate { cost, axis, split: i });
                }
                left.expand_by_aabb(&self.prim_bounds[order[i]]);
            }
        }

        best
    }

    fn sort_range(&mut self, start: usize, end: usize, axis: usize) {
        let centroids = &self.prim_centroids;
        self.indices[start..end].sort_by(|a, b| centroids[*a][axis].total_cmp(&centroids[*b][axis]));
    }

    fn range_bounds(&self, start: usize, end: usize) -> AABB {
        let mut bounds = self.prim_bounds[self.indices[start]];
        for &idx in &self.indices[start + 1..end] {
            bounds.expand_by_aabb(&self.prim_bounds[idx]);
        }
        bounds
    }
}
