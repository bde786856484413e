//! In-memory ranking service for tests and offline demos.
//!
//! Pairs are served round-robin over every unjudged pair of items. Once every
//! pair has a judgment the service reports completion and ranks items by wins.
//! Tests can script pair responses, inject faults per endpoint, add latency,
//! and inspect the call log.

use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::client::RankingService;
use super::error::{Endpoint, ServiceError, ServiceResult};
use super::wire::PairResponse;
use crate::model::{ComparisonPair, Item, ItemId, Judgment, NewItem};

#[derive(Default)]
struct MockState {
    items: Vec<Item>,
    judgments: Vec<Judgment>,
    next_id: u64,
    scripted_pairs: VecDeque<PairResponse>,
    stalled: bool,
    faults: HashMap<Endpoint, VecDeque<ServiceError>>,
    calls: Vec<Endpoint>,
}

#[derive(Default)]
pub struct MockRankingService {
    state: Mutex<MockState>,
    latency: Option<Duration>,
}

impl MockRankingService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the service with items titled after `titles`, ids `item-1`, `item-2`, ...
    pub fn with_titles<I, T>(titles: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let service = Self::new();
        {
            let mut state = service.state.lock();
            for title in titles {
                let item = state.allocate(title.into(), String::new());
                state.items.push(item);
            }
        }
        service
    }

    /// Seeds the service with fully specified items (ranks included).
    pub fn with_items(items: Vec<Item>) -> Self {
        let service = Self::new();
        service.state.lock().items = items;
        service
    }

    /// Delays every call, so concurrent callers can observe an in-flight operation.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Queues responses returned by `next_pair` before the computed ones.
    pub fn script_pairs(&self, responses: impl IntoIterator<Item = PairResponse>) {
        self.state.lock().scripted_pairs.extend(responses);
    }

    /// While stalled, `next_pair` reports completion regardless of state.
    pub fn set_stalled(&self, stalled: bool) {
        self.state.lock().stalled = stalled;
    }

    /// Makes the next call to `endpoint` fail with `error` (queued, one per call).
    pub fn fail_next(&self, endpoint: Endpoint, error: ServiceError) {
        self.state
            .lock()
            .faults
            .entry(endpoint)
            .or_default()
            .push_back(error);
    }

    pub fn items(&self) -> Vec<Item> {
        self.state.lock().items.clone()
    }

    pub fn judgments(&self) -> Vec<Judgment> {
        self.state.lock().judgments.clone()
    }

    pub fn calls(&self) -> Vec<Endpoint> {
        self.state.lock().calls.clone()
    }

    pub fn call_count(&self, endpoint: Endpoint) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|&&call| call == endpoint)
            .count()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    async fn enter(&self, endpoint: Endpoint) -> ServiceResult<()> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.state.lock();
        state.calls.push(endpoint);
        match state.faults.get_mut(&endpoint).and_then(VecDeque::pop_front) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl MockState {
    fn allocate(&mut self, title: String, description: String) -> Item {
        self.next_id += 1;
        Item::new(format!("item-{}", self.next_id), title).with_description(description)
    }

    fn judged(&self, a: &ItemId, b: &ItemId) -> bool {
        self.judgments.iter().any(|j| {
            (j.winner_id == *a && j.loser_id == *b) || (j.winner_id == *b && j.loser_id == *a)
        })
    }

    fn compute_next_pair(&mut self) -> PairResponse {
        for (i, left) in self.items.iter().enumerate() {
            for right in &self.items[i + 1..] {
                if !self.judged(&left.id, &right.id) {
                    return PairResponse::Pair(ComparisonPair::new(left.clone(), right.clone()));
                }
            }
        }

        if self.items.len() >= 2 {
            self.assign_ranks();
        }
        PairResponse::Complete
    }

    fn assign_ranks(&mut self) {
        let mut wins: HashMap<ItemId, usize> = HashMap::new();
        for judgment in &self.judgments {
            *wins.entry(judgment.winner_id.clone()).or_default() += 1;
        }

        let mut order: Vec<usize> = (0..self.items.len()).collect();
        order.sort_by_key(|&idx| {
            std::cmp::Reverse(wins.get(&self.items[idx].id).copied().unwrap_or(0))
        });

        for (position, idx) in order.into_iter().enumerate() {
            self.items[idx].rank = Some(position as u32 + 1);
        }
    }
}

#[async_trait]
impl RankingService for MockRankingService {
    async fn list_items(&self) -> ServiceResult<Vec<Item>> {
        self.enter(Endpoint::ListItems).await?;
        Ok(self.state.lock().items.clone())
    }

    async fn next_pair(&self) -> ServiceResult<PairResponse> {
        self.enter(Endpoint::NextPair).await?;
        let mut state = self.state.lock();
        if let Some(scripted) = state.scripted_pairs.pop_front() {
            return Ok(scripted);
        }
        if state.stalled {
            return Ok(PairResponse::Complete);
        }
        Ok(state.compute_next_pair())
    }

    async fn add_item(&self, item: &NewItem) -> ServiceResult<Item> {
        self.enter(Endpoint::AddItem).await?;
        let mut state = self.state.lock();
        let created = state.allocate(item.title.clone(), item.description.clone());
        state.items.push(created.clone());
        Ok(created)
    }

    async fn delete_item(&self, id: &ItemId) -> ServiceResult<()> {
        self.enter(Endpoint::DeleteItem).await?;
        let mut state = self.state.lock();
        let before = state.items.len();
        state.items.retain(|item| item.id != *id);
        if state.items.len() == before {
            return Err(ServiceError::server(
                Endpoint::DeleteItem,
                404,
                format!("item {id} not found"),
            ));
        }
        state
            .judgments
            .retain(|j| j.winner_id != *id && j.loser_id != *id);
        Ok(())
    }

    async fn submit_choice(&self, judgment: &Judgment) -> ServiceResult<()> {
        self.enter(Endpoint::SubmitChoice).await?;
        let mut state = self.state.lock();
        let known: HashSet<&ItemId> = state.items.iter().map(|item| &item.id).collect();
        if !known.contains(&judgment.winner_id) || !known.contains(&judgment.loser_id) {
            return Err(ServiceError::server(
                Endpoint::SubmitChoice,
                400,
                "unknown item in judgment",
            ));
        }
        state.judgments.push(judgment.clone());
        Ok(())
    }

    async fn reset(&self) -> ServiceResult<()> {
        self.enter(Endpoint::Reset).await?;
        let mut state = self.state.lock();
        state.judgments.clear();
        for item in &mut state.items {
            item.rank = None;
        }
        Ok(())
    }
}
