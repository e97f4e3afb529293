//! Sharding independent games across threads.

use rayon::prelude::*;

use crate::error::Result;

/// Run `game(i)` for every `i` in `0..count`, in order of `i`.
///
/// With more than one worker the games run on a dedicated rayon pool. Each
/// game derives everything from its index, so the output does not depend on
/// scheduling. The first error aborts the whole run.
pub(crate) fn run_games<T, F>(count: usize, workers: usize, game: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(usize) -> Result<T> + Sync + Send,
{
    if workers <= 1 {
        return (0..count).map(game).collect();
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()?;
    pool.install(|| (0..count).into_par_iter().map(&game).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_parallel_matches_sequential() {
        let square = |i: usize| Ok(i * i);
        let sequential = run_games(50, 1, square).unwrap();
        let parallel = run_games(50, 4, square).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_error_aborts_run() {
        let result = run_games(10, 2, |i| {
            if i == 7 {
                Err(Error::TerminalState)
            } else {
                Ok(i)
            }
        });
        assert!(result.is_err());
    }
}
