//! Shared fixtures for handler tests.

use std::sync::Arc;

use chrono::TimeZone;
use chrono_tz::Europe::Oslo;

use crate::adapters::auth::InMemorySessions;
use crate::adapters::clock::FixedClock;
use crate::adapters::storage::{
    InMemoryKlippekortCatalog, InMemoryMembershipCatalog, InMemoryRulesRepository,
    InMemoryUserKlippekortRepository, InMemoryUserMembershipRepository,
};
use crate::application::{RuleConfiguration, StoragePolicy};
use crate::domain::foundation::{LocalTime, Timestamp, UserId};
use crate::domain::klippekort::{KlippekortPackage, NewKlippekortPackage};
use crate::domain::membership::{Membership, MembershipRules, NewMembershipPlan, UserMembership};
use crate::ports::{KlippekortCatalog, MembershipCatalog, UserMembershipRepository};

pub(crate) const ADMIN: &str = "staff-1";

pub(crate) fn user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

pub(crate) fn start() -> LocalTime {
    Oslo.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap()
}

pub(crate) struct Fixture {
    pub memberships: Arc<InMemoryUserMembershipRepository>,
    pub klippekort: Arc<InMemoryUserKlippekortRepository>,
    pub plans: Arc<InMemoryMembershipCatalog>,
    pub packages: Arc<InMemoryKlippekortCatalog>,
    pub rules_repo: Arc<InMemoryRulesRepository>,
    pub rules: Arc<RuleConfiguration>,
    pub clock: Arc<FixedClock>,
    pub auth: Arc<InMemorySessions>,
    pub storage: StoragePolicy,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_rules(MembershipRules::default())
    }

    pub fn with_rules(rules: MembershipRules) -> Self {
        let storage = StoragePolicy::default();
        let rules_repo = Arc::new(InMemoryRulesRepository::with_rules(rules));
        Self {
            memberships: Arc::new(InMemoryUserMembershipRepository::new()),
            klippekort: Arc::new(InMemoryUserKlippekortRepository::new()),
            plans: Arc::new(InMemoryMembershipCatalog::new()),
            packages: Arc::new(InMemoryKlippekortCatalog::new()),
            rules: Arc::new(RuleConfiguration::new(rules_repo.clone(), storage)),
            rules_repo,
            clock: Arc::new(FixedClock::new(start())),
            auth: Arc::new(InMemorySessions::new().with_admin(ADMIN)),
            storage,
        }
    }

    pub async fn plan(&self, name: &str, price: i64, commitment_months: u32) -> Membership {
        let plan = Membership::create(
            NewMembershipPlan {
                name: name.to_string(),
                price,
                commitment_months,
                student_senior_eligible: false,
                special_offer: false,
                description: String::new(),
                features: vec![],
            },
            Timestamp::from_datetime(start()),
        )
        .unwrap();
        self.plans.insert(&plan).await.unwrap();
        plan
    }

    pub async fn package(&self, klipp_count: u32, price: i64, validity_days: u32) -> KlippekortPackage {
        let package = KlippekortPackage::create(
            NewKlippekortPackage {
                name: format!("{}-klipp", klipp_count),
                category: "yoga".to_string(),
                klipp_count,
                price,
                validity_days,
                popular: false,
            },
            Timestamp::from_datetime(start()),
        )
        .unwrap();
        self.packages.insert(&package).await.unwrap();
        package
    }

    pub async fn subscribe(&self, user_id: &str, plan: &Membership) -> UserMembership {
        let membership = UserMembership::subscribe(user(user_id), plan, &start()).unwrap();
        self.memberships.insert(&membership).await.unwrap();
        membership
    }

    pub async fn current(&self, user_id: &str) -> Option<UserMembership> {
        self.memberships.load_current(&user(user_id)).await.unwrap()
    }
}
