//! Frontier and visited-set bookkeeping for a single crawl
//!
//! The frontier is a strict FIFO queue, which makes the crawl breadth-first.
//! A URL moves to the visited list the moment it is dequeued, before it is
//! fetched, so it can never be queued again.

use crate::url::Origin;
use crate::UrlResult;
use std::collections::{HashSet, VecDeque};
use url::Url;

#[derive(Debug)]
pub struct Frontier {
    /// Scope of the crawl
    origin: Origin,

    /// Page budget
    max_pages: usize,

    /// URLs waiting to be fetched, in discovery order
    queue: VecDeque<String>,

    /// Membership index for `queue`
    queued: HashSet<String>,

    /// Dequeued URLs, in visitation order
    visited: Vec<String>,

    /// Membership index for `visited`
    visited_set: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier holding only the seed URL
    pub fn new(seed: &Url, max_pages: usize) -> UrlResult<Self> {
        let origin = Origin::of(seed)?;
        let seed = seed.to_string();

        Ok(Self {
            origin,
            max_pages,
            queue: VecDeque::from([seed.clone()]),
            queued: HashSet::from([seed]),
            visited: Vec::new(),
            visited_set: HashSet::new(),
        })
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Returns true while fewer than `max_pages` URLs have been dequeued
    pub fn has_budget(&self) -> bool {
        self.visited.len() < self.max_pages
    }

    /// Returns true once nothing more will be fetched
    pub fn is_exhausted(&self) -> bool {
        self.queue.is_empty() || !self.has_budget()
    }

    /// Takes the next unvisited URL off the head of the queue and marks it visited
    ///
    /// Entries that are already visited are dropped without counting toward the
    /// page budget. Returns None when the queue runs dry or the budget is spent.
    pub fn next_url(&mut self) -> Option<String> {
        if !self.has_budget() {
            return None;
        }

        while let Some(url) = self.queue.pop_front() {
            self.queued.remove(&url);

            if self.visited_set.contains(&url) {
                tracing::trace!("Skipping already visited {}", url);
                continue;
            }

            self.visited_set.insert(url.clone());
            self.visited.push(url.clone());
            return Some(url);
        }

        None
    }

    /// Queues a discovered URL if it is in scope and new
    ///
    /// A URL is accepted when it starts with the crawl origin, has not been
    /// visited, is not already queued, and the queue holds fewer than
    /// `max_pages` entries.
    ///
    /// # Returns
    ///
    /// True if the URL was added to the queue
    pub fn enqueue(&mut self, url: String) -> bool {
        if !self.origin.contains(&url) {
            return false;
        }

        if self.visited_set.contains(&url) || self.queued.contains(&url) {
            return false;
        }

        if self.queue.len() >= self.max_pages {
            return false;
        }

        self.queued.insert(url.clone());
        self.queue.push_back(url);
        true
    }

    /// URLs dequeued so far, in visitation order
    pub fn visited(&self) -> &[String] {
        &self.visited
    }

    /// Number of URLs waiting in the queue
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn into_visited(self) -> Vec<String> {
        self.visited
    }
}
