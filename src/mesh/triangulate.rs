/// Fan triangulation of a polygon with `count` corners: every triangle
/// shares corner 0. Yields `count - 2` triangles of corner positions, or
/// nothing for fewer than 3 corners.
///
/// Only correct for convex polygons; concave input is split as-is.
pub fn fan(count: usize) -> impl Iterator<Item = [usize; 3]> {
    return (1..count.saturating_sub(1)).map(|i| [0, i, i + 1]);
}
