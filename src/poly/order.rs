//! Monomial orders.
//!
//! A polynomial stores its terms sorted ascending in its order, so that the
//! leading monomial is the last one.

use std::cmp::Ordering;
use std::sync::Arc;

use super::Exponent;

/// A total order on exponent vectors.
///
/// Every order except [MonomialOrder::Alex] is admissible: it is compatible
/// with multiplication and `1` is the smallest monomial.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum MonomialOrder {
    /// Lexicographic order, where the first variable is the most significant.
    #[default]
    Lex,
    /// The reverse of [MonomialOrder::Lex].
    Alex,
    /// Graded lexicographic order.
    Grlex,
    /// Graded reverse lexicographic order.
    Grevlex,
    /// Graded reverse lexicographic order on the permuted exponent vector
    /// `(e[perm[0]], e[perm[1]], ...)`.
    PermutedGrevlex(Arc<Vec<usize>>),
    /// Compare the degree in `variable` first and break ties with `base`.
    Elimination {
        base: Arc<MonomialOrder>,
        variable: usize,
    },
    /// A block order: each entry `(order, n)` compares the next `n` variables.
    Product(Arc<Vec<(MonomialOrder, usize)>>),
}

impl MonomialOrder {
    /// Compare two exponent vectors of equal length.
    pub fn cmp<E: Exponent>(&self, a: &[E], b: &[E]) -> Ordering {
        debug_assert_eq!(a.len(), b.len());

        match self {
            MonomialOrder::Lex => a.cmp(b),
            MonomialOrder::Alex => b.cmp(a),
            MonomialOrder::Grlex => {
                let deg_a: u32 = a.iter().map(|x| x.to_u32()).sum();
                let deg_b: u32 = b.iter().map(|x| x.to_u32()).sum();
                deg_a.cmp(&deg_b).then_with(|| a.cmp(b))
            }
            MonomialOrder::Grevlex => {
                let deg_a: u32 = a.iter().map(|x| x.to_u32()).sum();
                let deg_b: u32 = b.iter().map(|x| x.to_u32()).sum();
                deg_a
                    .cmp(&deg_b)
                    .then_with(|| a.iter().rev().cmp(b.iter().rev()).reverse())
            }
            MonomialOrder::PermutedGrevlex(perm) => {
                let deg_a: u32 = a.iter().map(|x| x.to_u32()).sum();
                let deg_b: u32 = b.iter().map(|x| x.to_u32()).sum();
                deg_a.cmp(&deg_b).then_with(|| {
                    perm.iter()
                        .rev()
                        .map(|&i| a[i])
                        .cmp(perm.iter().rev().map(|&i| b[i]))
                        .reverse()
                })
            }
            MonomialOrder::Elimination { base, variable } => a[*variable]
                .cmp(&b[*variable])
                .then_with(|| base.cmp(a, b)),
            MonomialOrder::Product(blocks) => {
                let mut start = 0;
                for (order, len) in blocks.iter() {
                    let end = start + len;
                    match order.cmp(&a[start..end], &b[start..end]) {
                        Ordering::Equal => start = end,
                        o => return o,
                    }
                }
                Ordering::Equal
            }
        }
    }

    /// Compare two optional exponent vectors, where `None` is smaller than any monomial.
    /// This is used when iterating over two polynomials in parallel.
    pub fn cmp_with_null<E: Exponent>(&self, a: Option<&[E]>, b: Option<&[E]>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => self.cmp(a, b),
        }
    }

    /// Returns `true` if the order compares the total degree first.
    pub fn is_graded(&self) -> bool {
        matches!(
            self,
            MonomialOrder::Grlex | MonomialOrder::Grevlex | MonomialOrder::PermutedGrevlex(_)
        )
    }

    /// Returns `true` if `1` is smaller than any other monomial.
    pub fn is_admissible(&self) -> bool {
        match self {
            MonomialOrder::Alex => false,
            MonomialOrder::Elimination { base, .. } => base.is_admissible(),
            MonomialOrder::Product(blocks) => blocks.iter().all(|(o, _)| o.is_admissible()),
            _ => true,
        }
    }
}

#[cfg(test)]
mod test {
    use std::cmp::Ordering;
    use std::sync::Arc;

    use super::MonomialOrder;

    #[test]
    fn graded() {
        let a: [u16; 3] = [1, 0, 2];
        let b: [u16; 3] = [0, 3, 0];

        assert_eq!(MonomialOrder::Lex.cmp(&a, &b), Ordering::Greater);
        assert_eq!(MonomialOrder::Alex.cmp(&a, &b), Ordering::Less);
        assert_eq!(MonomialOrder::Grlex.cmp(&a, &b), Ordering::Greater);

        // x*y*z vs x^2*z: equal degree, smallest power of the last variable wins
        let c: [u16; 3] = [1, 1, 1];
        let d: [u16; 3] = [2, 0, 1];
        assert_eq!(MonomialOrder::Grevlex.cmp(&c, &d), Ordering::Less);
        let e: [u16; 3] = [0, 3, 0];
        let f: [u16; 3] = [1, 1, 1];
        assert_eq!(MonomialOrder::Grevlex.cmp(&e, &f), Ordering::Greater);
        assert_eq!(MonomialOrder::Grlex.cmp(&e, &f), Ordering::Less);

        let p = MonomialOrder::PermutedGrevlex(Arc::new(vec![2, 1, 0]));
        assert_eq!(p.cmp(&e, &f), Ordering::Greater);
        assert!(p.is_graded());
    }

    #[test]
    fn block_orders() {
        let elim = MonomialOrder::Elimination {
            base: Arc::new(MonomialOrder::Grevlex),
            variable: 2,
        };
        let a: [u16; 3] = [5, 5, 0];
        let b: [u16; 3] = [0, 0, 1];
        assert_eq!(elim.cmp(&a, &b), Ordering::Less);

        let prod = MonomialOrder::Product(Arc::new(vec![
            (MonomialOrder::Lex, 1),
            (MonomialOrder::Grlex, 2),
        ]));
        let c: [u16; 3] = [1, 0, 1];
        let d: [u16; 3] = [1, 2, 0];
        assert_eq!(prod.cmp(&c, &d), Ordering::Less);
        assert!(prod.is_admissible());
        assert!(!MonomialOrder::Alex.is_admissible());

        assert_eq!(
            MonomialOrder::Lex.cmp_with_null::<u16>(None, Some(&[0, 0, 0])),
            Ordering::Less
        );
    }
}
