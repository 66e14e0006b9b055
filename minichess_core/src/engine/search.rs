use crate::engine::clock::Deadline;
use crate::engine::config::EngineConfig;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::eval::MaterialEvaluator;
use crate::engine::guard::AppliedMove;
use crate::engine::ordering::{KillerTable, MoveOrderer};
use crate::engine::tt::TranspositionTable;
use crate::engine::{
    Evaluator, PositionOracle, SearchLimit, SearchReport, SearchStats, Searcher, SCORE_INF,
};
use std::sync::Arc;
use std::time::Duration;

pub struct AlphaBetaEngine<P: PositionOracle, E = MaterialEvaluator> {
    config: Arc<EngineConfig>,
    evaluator: E,
    orderer: MoveOrderer,
    tt: TranspositionTable<P::Move>,
    killer_moves: KillerTable<P::Move>,
    stats: SearchStats,
    deadline: Deadline,
}

impl<P: PositionOracle> AlphaBetaEngine<P> {
    #[must_use]
    pub fn new(config: Arc<EngineConfig>) -> Self {
        let evaluator = MaterialEvaluator::new(config.clone());
        Self::with_evaluator(config, evaluator)
    }

    pub fn update_config(&mut self, config: Arc<EngineConfig>) {
        if config.tt_capacity != self.config.tt_capacity {
            self.tt = TranspositionTable::new(config.tt_capacity);
        }
        self.evaluator = MaterialEvaluator::new(config.clone());
        self.orderer = MoveOrderer::new(config.clone());
        self.config = config;
    }
}

impl<P: PositionOracle, E: Evaluator<P>> AlphaBetaEngine<P, E> {
    pub fn with_evaluator(config: Arc<EngineConfig>, evaluator: E) -> Self {
        Self {
            orderer: MoveOrderer::new(config.clone()),
            tt: TranspositionTable::new(config.tt_capacity),
            killer_moves: KillerTable::new(),
            stats: SearchStats::default(),
            deadline: Deadline::unlimited(),
            evaluator,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Counters from the most recent search.
    pub const fn stats(&self) -> SearchStats {
        self.stats
    }

    pub const fn transposition_table(&self) -> &TranspositionTable<P::Move> {
        &self.tt
    }

    /// Heuristic score of `position` for the side to move.
    pub fn evaluate_board(&self, position: &P) -> i32 {
        self.evaluator.evaluate(position)
    }

    /// Searches to the configured depth, within the position's own clock or
    /// the configured default budget.
    ///
    /// # Errors
    ///
    /// See [`Searcher::search`].
    pub fn think(&mut self, position: &mut P) -> EngineResult<Option<SearchReport<P::Move>>> {
        let budget = position
            .time_left()
            .unwrap_or_else(|| Duration::from_millis(self.config.default_time_ms));
        let budget_ms = u64::try_from(budget.as_millis()).unwrap_or(u64::MAX);
        self.search(
            position,
            SearchLimit::DepthAndTime(self.config.max_depth, budget_ms),
        )
    }

    /// Best move within budget, or `None` if there is no legal move or no
    /// iteration finished in time.
    pub fn get_best_move(&mut self, position: &mut P) -> Option<P::Move> {
        match self.think(position) {
            Ok(report) => report.map(|r| r.best_move),
            Err(err) => {
                log::error!("search aborted: {err}");
                None
            }
        }
    }

    fn reset(&mut self) {
        self.tt.clear();
        self.killer_moves.clear();
        self.stats = SearchStats::default();
    }

    fn alpha_beta(
        &mut self,
        position: &mut P,
        depth: u8,
        mut alpha: i32,
        beta: i32,
    ) -> EngineResult<i32> {
        if self.deadline.expired() {
            return Err(EngineError::Timeout);
        }
        self.stats.nodes += 1;

        let hash = position.hash();
        if let Some(score) = self.tt.probe(hash, depth) {
            self.stats.tt_hits += 1;
            return Ok(score);
        }

        if depth == 0 || position.is_terminal() {
            return Ok(self.evaluate_leaf(position, hash, depth));
        }

        let moves = position.legal_moves();
        if moves.is_empty() {
            return Ok(self.evaluate_leaf(position, hash, depth));
        }
        let moves = self.orderer.order(moves, &self.killer_moves);

        let mut value = -SCORE_INF;
        let mut best_move = None;

        for mv in moves {
            let score = {
                let mut child = AppliedMove::apply(position, &mv)
                    .map_err(|err| EngineError::rejected(&mv, err))?;
                -self.alpha_beta(&mut child, depth - 1, -beta, -alpha)?
            };

            if score > value {
                value = score;
                best_move = Some(mv.clone());
            }
            alpha = alpha.max(value);

            if alpha >= beta {
                self.killer_moves.record(depth, &mv);
                self.stats.cutoffs += 1;
                break;
            }
        }

        self.tt.store(hash, value, depth, best_move);
        Ok(value)
    }

    fn evaluate_leaf(&mut self, position: &P, hash: u64, depth: u8) -> i32 {
        let score = self.evaluator.evaluate(position);
        self.tt.store(hash, score, depth, None);
        score
    }

    /// Full-window search of every root move. Moves the position refuses are
    /// skipped rather than aborting the iteration.
    fn search_root(&mut self, position: &mut P, depth: u8) -> EngineResult<Option<(P::Move, i32)>> {
        if self.deadline.expired() {
            return Err(EngineError::Timeout);
        }
        self.stats.nodes += 1;

        let moves = self
            .orderer
            .order(position.legal_moves(), &self.killer_moves);
        let mut alpha = -SCORE_INF;
        let beta = SCORE_INF;
        let mut best: Option<(P::Move, i32)> = None;

        for mv in moves {
            if self.deadline.expired() {
                return Err(EngineError::Timeout);
            }

            let score = match AppliedMove::apply(position, &mv) {
                Ok(mut child) => {
                    -self.alpha_beta(&mut child, depth.saturating_sub(1), -beta, -alpha)?
                }
                Err(err) => {
                    log::warn!("skipping root move {mv:?}: {err}");
                    continue;
                }
            };

            let improves = match &best {
                Some((_, best_score)) => score > *best_score,
                None => true,
            };
            if improves {
                best = Some((mv, score));
            }
            alpha = alpha.max(score);
        }

        Ok(best)
    }

    fn principal_variation(&self, position: &mut P, first: &P::Move, depth: u8) -> Vec<P::Move> {
        let mut line = Vec::with_capacity(usize::from(depth));
        self.extend_line(position, first, depth, &mut line);
        line
    }

    fn extend_line(&self, position: &mut P, mv: &P::Move, remaining: u8, line: &mut Vec<P::Move>) {
        if remaining == 0 {
            return;
        }
        let Ok(mut child) = AppliedMove::apply(position, mv) else {
            return;
        };
        line.push(mv.clone());

        // Hash collisions can hand back a move from another position.
        if let Some(next) = self.tt.best_move(child.hash()) {
            if child.legal_moves().contains(&next) {
                self.extend_line(&mut child, &next, remaining - 1, line);
            }
        }
    }
}

impl<P: PositionOracle, E: Evaluator<P>> Searcher<P> for AlphaBetaEngine<P, E> {
    fn search(
        &mut self,
        position: &mut P,
        limit: SearchLimit,
    ) -> EngineResult<Option<SearchReport<P::Move>>> {
        self.reset();
        self.deadline = Deadline::start(limit.time_budget(), self.config.time_fraction);

        let mut best: Option<(P::Move, i32)> = None;

        for depth in 1..=limit.max_depth() {
            match self.search_root(position, depth) {
                Ok(Some((mv, score))) => {
                    log::debug!(
                        "depth {depth} complete: {mv:?} scores {score} ({} nodes)",
                        self.stats.nodes
                    );
                    self.stats.depth = depth;
                    best = Some((mv, score));
                }
                // No legal moves: deeper iterations cannot find one either.
                Ok(None) => break,
                Err(EngineError::Timeout) => {
                    log::debug!(
                        "depth {depth} timed out, keeping depth {}",
                        self.stats.depth
                    );
                    break;
                }
                Err(err) if best.is_some() => {
                    log::error!(
                        "depth {depth} aborted: {err}, keeping depth {}",
                        self.stats.depth
                    );
                    break;
                }
                Err(err) => return Err(err),
            }

            if self.deadline.expired() {
                break;
            }
        }

        self.stats.time_ms = u64::try_from(self.deadline.elapsed().as_millis()).unwrap_or(u64::MAX);

        Ok(best.map(|(best_move, score)| {
            let principal_variation =
                self.principal_variation(position, &best_move, self.stats.depth);
            SearchReport {
                best_move,
                score,
                stats: self.stats,
                principal_variation,
            }
        }))
    }
}
