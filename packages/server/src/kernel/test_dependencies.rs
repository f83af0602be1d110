// TestDependencies - mock implementations for testing
//
// Provides an in-memory store and a scripted AI that can be injected into
// ServerDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use openai_client::OpenAIError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use super::{BaseAI, BaseComplaintStore, ServerDeps};
use crate::common::{ComplaintId, ProfileId};
use crate::domains::complaints::models::{
    Complaint, ComplaintCategory, ComplaintFilter, ComplaintReview, ComplaintStatus,
    NewComplaint, Profile,
};
use crate::domains::complaints::SimilarityConfig;

// =============================================================================
// Mock AI
// =============================================================================

/// Arguments captured from a chat call
#[derive(Debug, Clone)]
pub struct ChatCallArgs {
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
}

pub struct MockAI {
    responses: Arc<Mutex<Vec<openai_client::Result<String>>>>,
    calls: Arc<Mutex<Vec<ChatCallArgs>>>,
}

impl MockAI {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a text response to the queue
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(Ok(response.into()));
        self
    }

    /// Add a JSON response to the queue (will be serialized)
    pub fn with_json_response<T: serde::Serialize>(self, data: &T) -> Self {
        let json = serde_json::to_string(data).expect("Failed to serialize mock response");
        self.with_response(json)
    }

    /// Add a failure to the queue
    pub fn with_error(self, error: OpenAIError) -> Self {
        self.responses.lock().unwrap().push(Err(error));
        self
    }

    /// Get all calls that were sent to the AI
    pub fn calls(&self) -> Vec<ChatCallArgs> {
        self.calls.lock().unwrap().clone()
    }

    /// Get the last user prompt sent to the AI
    pub fn last_user_prompt(&self) -> Option<String> {
        self.calls
            .lock()
            .unwrap()
            .last()
            .map(|c| c.user_prompt.clone())
    }

    /// Get the number of times the AI was called
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockAI {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn complete_chat(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
    ) -> openai_client::Result<String> {
        // Record the call
        self.calls.lock().unwrap().push(ChatCallArgs {
            system_prompt: system_prompt.to_string(),
            user_prompt: user_prompt.to_string(),
            temperature,
        });

        let mut responses = self.responses.lock().unwrap();
        if !responses.is_empty() {
            responses.remove(0)
        } else {
            // No matches by default
            Ok("[]".to_string())
        }
    }
}

// =============================================================================
// In-memory Complaint Store
// =============================================================================

/// Complaint store backed by hash maps.
///
/// `created_at` is assigned from a counter so that insertion order is also
/// recency order, newest last inserted.
pub struct InMemoryComplaintStore {
    complaints: Mutex<HashMap<ComplaintId, Complaint>>,
    profiles: Mutex<HashMap<ProfileId, Profile>>,
    clock: AtomicI64,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_profiles: AtomicBool,
    duplicate_writes: Mutex<Vec<(ComplaintId, ComplaintId)>>,
}

impl InMemoryComplaintStore {
    pub fn new() -> Self {
        Self {
            complaints: Mutex::new(HashMap::new()),
            profiles: Mutex::new(HashMap::new()),
            clock: AtomicI64::new(0),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            fail_profiles: AtomicBool::new(false),
            duplicate_writes: Mutex::new(Vec::new()),
        }
    }

    fn tick(&self) -> DateTime<Utc> {
        let step = self.clock.fetch_add(1, Ordering::SeqCst);
        DateTime::<Utc>::UNIX_EPOCH + Duration::days(20_000) + Duration::seconds(step)
    }

    /// Insert a profile
    pub fn add_profile(&self, name: &str, email: &str) -> ProfileId {
        let id = ProfileId::new();
        let profile = Profile {
            id,
            name: name.to_string(),
            email: email.to_string(),
            created_at: self.tick(),
        };
        self.profiles.lock().unwrap().insert(id, profile);
        id
    }

    /// Insert a pending original complaint, newer than everything before it
    pub fn add_complaint(
        &self,
        student_id: ProfileId,
        title: &str,
        description: &str,
        category: ComplaintCategory,
    ) -> ComplaintId {
        let now = self.tick();
        let complaint = Complaint {
            id: ComplaintId::new(),
            student_id,
            title: title.to_string(),
            description: description.to_string(),
            category,
            status: ComplaintStatus::Pending,
            resolution_notes: None,
            image_urls: Vec::new(),
            is_duplicate: false,
            duplicate_of: None,
            created_at: now,
            updated_at: now,
        };
        self.insert(complaint)
    }

    /// Insert a fully specified complaint as-is
    pub fn insert(&self, complaint: Complaint) -> ComplaintId {
        let id = complaint.id;
        self.complaints.lock().unwrap().insert(id, complaint);
        id
    }

    /// Snapshot of one complaint
    pub fn get(&self, id: ComplaintId) -> Option<Complaint> {
        self.complaints.lock().unwrap().get(&id).cloned()
    }

    pub fn complaint_count(&self) -> usize {
        self.complaints.lock().unwrap().len()
    }

    /// Every `(duplicate, original)` pair written through `mark_duplicate`
    pub fn duplicate_writes(&self) -> Vec<(ComplaintId, ComplaintId)> {
        self.duplicate_writes.lock().unwrap().clone()
    }

    /// Make complaint reads fail
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every write fail
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make profile lookups fail
    pub fn fail_profiles(&self, fail: bool) {
        self.fail_profiles.store(fail, Ordering::SeqCst);
    }

    fn check_reads(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            anyhow::bail!("simulated read failure");
        }
        Ok(())
    }

    fn check_writes(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("simulated write failure");
        }
        Ok(())
    }

    fn newest_first(mut complaints: Vec<Complaint>) -> Vec<Complaint> {
        complaints.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        complaints
    }
}

impl Default for InMemoryComplaintStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseComplaintStore for InMemoryComplaintStore {
    async fn find_complaint(&self, id: ComplaintId) -> Result<Option<Complaint>> {
        self.check_reads()?;
        Ok(self.get(id))
    }

    async fn list_recent_complaints(
        &self,
        excluding: ComplaintId,
        limit: i64,
    ) -> Result<Vec<Complaint>> {
        self.check_reads()?;
        let all = self
            .complaints
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.id != excluding)
            .cloned()
            .collect();
        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        Ok(Self::newest_first(all).into_iter().take(limit).collect())
    }

    async fn find_profile(&self, id: ProfileId) -> Result<Option<Profile>> {
        if self.fail_profiles.load(Ordering::SeqCst) {
            anyhow::bail!("simulated profile failure");
        }
        Ok(self.profiles.lock().unwrap().get(&id).cloned())
    }

    async fn mark_duplicate(&self, duplicate: ComplaintId, original: ComplaintId) -> Result<()> {
        self.check_writes()?;
        let now = self.tick();
        let mut complaints = self.complaints.lock().unwrap();
        let Some(complaint) = complaints.get_mut(&duplicate) else {
            anyhow::bail!("complaint {duplicate} no longer exists");
        };
        complaint.is_duplicate = true;
        complaint.duplicate_of = Some(original);
        complaint.updated_at = now;
        self.duplicate_writes
            .lock()
            .unwrap()
            .push((duplicate, original));
        Ok(())
    }

    async fn create_complaint(&self, input: NewComplaint) -> Result<Complaint> {
        self.check_writes()?;
        let now = self.tick();
        let complaint = Complaint {
            id: ComplaintId::new(),
            student_id: input.student_id,
            title: input.title,
            description: input.description,
            category: input.category,
            status: ComplaintStatus::Pending,
            resolution_notes: None,
            image_urls: input.image_urls,
            is_duplicate: false,
            duplicate_of: None,
            created_at: now,
            updated_at: now,
        };
        self.insert(complaint.clone());
        Ok(complaint)
    }

    async fn list_complaints(&self, filter: ComplaintFilter) -> Result<Vec<Complaint>> {
        self.check_reads()?;
        let matching = self
            .complaints
            .lock()
            .unwrap()
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        Ok(Self::newest_first(matching))
    }

    async fn update_complaint(
        &self,
        id: ComplaintId,
        review: ComplaintReview,
    ) -> Result<Option<Complaint>> {
        self.check_writes()?;
        let now = self.tick();
        let mut complaints = self.complaints.lock().unwrap();
        let Some(complaint) = complaints.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(status) = review.status {
            complaint.status = status;
        }
        if let Some(notes) = review.resolution_notes {
            complaint.resolution_notes = Some(notes);
        }
        complaint.updated_at = now;
        Ok(Some(complaint.clone()))
    }

    async fn clear_resolved(&self) -> Result<u64> {
        self.check_writes()?;
        let mut complaints = self.complaints.lock().unwrap();

        let resolved: Vec<ComplaintId> = complaints
            .values()
            .filter(|c| c.status == ComplaintStatus::Resolved)
            .map(|c| c.id)
            .collect();

        for id in &resolved {
            complaints.remove(id);
        }
        for complaint in complaints.values_mut() {
            if complaint
                .duplicate_of
                .is_some_and(|original| resolved.contains(&original))
            {
                complaint.is_duplicate = false;
                complaint.duplicate_of = None;
            }
        }

        Ok(resolved.len() as u64)
    }

    async fn ping(&self) -> Result<()> {
        self.check_reads()
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub store: Arc<InMemoryComplaintStore>,
    pub ai: Arc<MockAI>,
    pub similarity: SimilarityConfig,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryComplaintStore::new()),
            ai: Arc::new(MockAI::new()),
            similarity: SimilarityConfig::default(),
        }
    }

    /// Set a mock AI
    pub fn mock_ai(mut self, ai: MockAI) -> Self {
        self.ai = Arc::new(ai);
        self
    }

    /// Override the similarity tuning
    pub fn similarity(mut self, similarity: SimilarityConfig) -> Self {
        self.similarity = similarity;
        self
    }

    /// Wire the mocks into ServerDeps
    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.store.clone(),
            self.ai.clone(),
            self.similarity.clone(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
