use crate::MindMap;
use rand::rngs::SmallRng;
use rand::Rng;
use std::cmp::Ordering;
use std::f32::consts::{FRAC_1_SQRT_2, PI};

/// Ring radius for depth-1 children before decay and randomization.
const BASE_RADIUS: f32 = 320.0;
/// Minimum arc length reserved per child when sizing a ring from crowding.
const ARC_SPACING: f32 = 110.0;
/// Clearance against nodes already placed anywhere else in the tree.
const CLEAR_ANY: f32 = 110.0;
const CLEAR_ANY_VERTICAL: f32 = 180.0;
/// Sibling clearances by how many of the pair sit on a vertical heading.
/// Vertical placements need more room: labels are wider than tall.
const CLEAR_SIBLING: f32 = 110.0;
const CLEAR_SIBLING_MIXED: f32 = 160.0;
const CLEAR_SIBLING_VERTICAL: f32 = 200.0;
/// Collision resolution is best-effort: grow rings at most this many times.
const MAX_ROUNDS: usize = 15;
const RADIUS_GROWTH: f32 = 1.25;
/// Random multiplier band applied independently to each ring axis.
const RADIUS_FACTOR_MIN: f32 = 0.2;
const RADIUS_FACTOR_MAX: f32 = 1.2;
/// Extra angular jitter for depth-1 branches, for organic branching.
const LEVEL_ONE_JITTER: f32 = 15.0 * PI / 180.0;

/// A heading within 45 degrees of straight up or down.
fn is_vertical(angle: f32) -> bool {
    angle.sin().abs() >= FRAC_1_SQRT_2
}

fn dist(a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

/// Working state for one spread pass. Operates on arena indices and
/// center positions; node records are only touched in the final write-back.
struct Layout<'a> {
    children: Vec<Vec<usize>>,
    desc: Vec<usize>,
    /// Centers before the pass; angular sort keys, so re-running spread
    /// after small edits keeps each branch on its visual side.
    orig: Vec<(f32, f32)>,
    /// Centers being computed.
    pos: Vec<(f32, f32)>,
    placed: Vec<usize>,
    rng: &'a mut SmallRng,
}

fn count_descendants(children: &[Vec<usize>], desc: &mut [usize], i: usize) -> usize {
    let mut total = 0;
    for &c in &children[i] {
        total += 1 + count_descendants(children, desc, c);
    }
    desc[i] = total;
    total
}

impl Layout<'_> {
    fn place_children(&mut self, parent: usize, start: f32, end: f32, depth: u32) {
        let kids = self.children[parent].clone();
        if kids.is_empty() {
            return;
        }
        let (px, py) = self.pos[parent];
        let (opx, opy) = self.orig[parent];

        // Preserve the existing angular order around the parent.
        let mut order: Vec<(usize, f32)> = kids
            .iter()
            .map(|&c| {
                let (cx, cy) = self.orig[c];
                (c, (cy - opy).atan2(cx - opx))
            })
            .collect();
        order.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

        let span = (end - start).max(f32::EPSILON);
        let total: f32 = order.iter().map(|&(c, _)| (self.desc[c] + 1) as f32).sum();

        let decayed = if depth > 1 {
            BASE_RADIUS * 0.5f32.powi(depth as i32 - 1)
        } else {
            BASE_RADIUS
        };
        let ring = decayed.max(order.len() as f32 * ARC_SPACING / span);
        let mut radius_x = ring * self.rng.gen_range(RADIUS_FACTOR_MIN..RADIUS_FACTOR_MAX);
        let mut radius_y = ring * self.rng.gen_range(RADIUS_FACTOR_MIN..RADIUS_FACTOR_MAX);

        // Angular slice per child, proportional to its subtree weight.
        let mut slices: Vec<(usize, f32, f32, f32)> = Vec::with_capacity(order.len());
        let mut cursor = start;
        for &(c, _) in &order {
            let width = span * (self.desc[c] + 1) as f32 / total;
            let mut angle = cursor + width * 0.5;
            if depth == 1 {
                angle += self.rng.gen_range(-LEVEL_ONE_JITTER..LEVEL_ONE_JITTER);
            }
            slices.push((c, angle, cursor, cursor + width));
            cursor += width;
        }

        let mut round = 0;
        loop {
            for &(c, angle, _, _) in &slices {
                self.pos[c] = (px + angle.cos() * radius_x, py + angle.sin() * radius_y);
            }
            round += 1;
            if round >= MAX_ROUNDS || !self.has_collision(parent, &slices) {
                break;
            }
            radius_x *= RADIUS_GROWTH;
            radius_y *= RADIUS_GROWTH;
        }

        for &(c, _, _, _) in &slices {
            self.placed.push(c);
        }
        for &(c, _, s0, s1) in &slices {
            self.place_children(c, s0, s1, depth + 1);
        }
    }

    fn has_collision(&self, parent: usize, slices: &[(usize, f32, f32, f32)]) -> bool {
        for (i, &(c, angle, _, _)) in slices.iter().enumerate() {
            let vertical = is_vertical(angle);
            let global_min = if vertical { CLEAR_ANY_VERTICAL } else { CLEAR_ANY };
            for &p in &self.placed {
                if p == parent {
                    continue;
                }
                if dist(self.pos[c], self.pos[p]) < global_min {
                    return true;
                }
            }
            for &(s, s_angle, _, _) in &slices[..i] {
                let pair_min = match (vertical, is_vertical(s_angle)) {
                    (true, true) => CLEAR_SIBLING_VERTICAL,
                    (true, false) | (false, true) => CLEAR_SIBLING_MIXED,
                    (false, false) => CLEAR_SIBLING,
                };
                if dist(self.pos[c], self.pos[s]) < pair_min {
                    return true;
                }
            }
        }
        false
    }
}

/// Recompute every node position: root pinned at the viewport center,
/// each subtree fanned into an angular slice proportional to its size.
/// Positions are written directly; the caller owns the history entry.
pub fn auto_spread_impl(m: &mut MindMap) {
    let n = m.nodes.len();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut root = None;
    for (i, node) in m.nodes.iter().enumerate() {
        match node.parent_id.as_deref().and_then(|pid| m.index_of(pid)) {
            Some(p) => children[p].push(i),
            None => root = Some(i),
        }
    }
    let root = match root {
        Some(r) => r,
        None => return,
    };

    let mut desc = vec![0usize; n];
    count_descendants(&children, &mut desc, root);

    let centers: Vec<(f32, f32)> = m.nodes.iter().map(|node| node.center()).collect();
    let mut layout = Layout {
        children,
        desc,
        orig: centers.clone(),
        pos: centers,
        placed: vec![root],
        rng: &mut m.rng,
    };
    layout.pos[root] = m.viewport.center();
    layout.place_children(root, -PI, PI, 1);
    let pos = layout.pos;

    for (i, node) in m.nodes.iter_mut().enumerate() {
        let (w, h) = node.size();
        node.x = pos[i].0 - w * 0.5;
        node.y = pos[i].1 - h * 0.5;
    }
}
