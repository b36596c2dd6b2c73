/// Positional access to a matched value's fields, so an action can take them
/// apart as a tuple.
///
/// ```
/// use firstmatch_core::{begin_match, Components};
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Components for Point {
///     type Parts = (i32, i32);
///
///     fn components(&self) -> (i32, i32) {
///         (self.x, self.y)
///     }
/// }
///
/// let session = begin_match(Point { x: 3, y: 4 });
/// let sum = session.try_type::<Point>().then_components(|(x, y)| x + y);
/// assert_eq!(sum, Some(7));
/// ```
pub trait Components {
    type Parts;

    fn components(&self) -> Self::Parts;
}
