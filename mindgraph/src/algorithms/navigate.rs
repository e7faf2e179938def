use crate::algorithms::visibility::{depth_impl, is_visible_impl};
use crate::model::{Direction, NodeId};
use crate::MindMap;

/// Off-axis drift is penalized twice as hard as raw distance, so a node
/// straight ahead beats a nearer one far off the travel axis.
const OFF_AXIS_WEIGHT: f32 = 2.0;

/// Directional nearest-neighbor over the visible set. Candidates must lie
/// strictly on the travel side of the current node; an active lock level
/// further restricts them to exactly that depth.
pub fn navigate_impl(m: &MindMap, current_id: &str, dir: Direction) -> Option<NodeId> {
    let current = m.node(current_id)?;
    let mut best: Option<(usize, f32)> = None;
    for (i, n) in m.iter_nodes().enumerate() {
        if n.id == current_id {
            continue;
        }
        let dx = n.x - current.x;
        let dy = n.y - current.y;
        let ahead = match dir {
            Direction::Right => dx > 0.0,
            Direction::Left => dx < 0.0,
            Direction::Bottom => dy > 0.0,
            Direction::Top => dy < 0.0,
        };
        if !ahead || !is_visible_impl(m, &n.id) {
            continue;
        }
        if let Some(lock) = m.lock_level() {
            if depth_impl(m, &n.id) != Some(lock) {
                continue;
            }
        }
        let off_axis = if dir.is_horizontal() { dy.abs() } else { dx.abs() };
        let score = (dx * dx + dy * dy).sqrt() + OFF_AXIS_WEIGHT * off_axis;
        if best.map_or(true, |(_, bs)| score < bs) {
            best = Some((i, score));
        }
    }
    best.map(|(i, _)| m.node_at(i).id.clone())
}
