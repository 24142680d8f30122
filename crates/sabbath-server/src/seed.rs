//! Demo content
//!
//! Fills each empty collection with a small fixed dataset. Collections that
//! already hold documents are left alone, so seeding twice inserts nothing
//! the second time.

use crate::content::ContentService;
use crate::error::ServerError;
use sabbath_core::{BlogPost, Challenge, EbookTest, Entity, EntityKind, Tip};
use sabbath_repository::{DocumentStore, Filter};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

/// Documents inserted per collection, keyed by plural name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub inserted: BTreeMap<&'static str, usize>,
}

impl SeedReport {
    pub fn total(&self) -> usize {
        self.inserted.values().sum()
    }
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|t| t.to_string()).collect()
}

/// The fixed demo dataset for `kind`
pub fn demo_entities(kind: EntityKind) -> Vec<Entity> {
    match kind {
        EntityKind::BlogPost => vec![
            BlogPost {
                excerpt: Some("למה כדאי לעצור ולנשום פעם בשבוע?".to_string()),
                tags: tags(&["התחלה", "מודעות"]),
                author: Some("צוות Digital Sabbath".to_string()),
                ..BlogPost::new(
                    "שבת דיגיטלית: התחלה עדינה",
                    "digital-sabbath-intro",
                    "# פתיחה\nיום אחד בלי מסכים יכול לשנות הכול.",
                )
            }
            .into(),
            BlogPost {
                excerpt: Some("הרגלים קצרים שמייצרים נוכחות.".to_string()),
                tags: tags(&["טיפים", "מיינדפולנס"]),
                author: Some("אורח".to_string()),
                ..BlogPost::new(
                    "טקסים קטנים לשקט גדול",
                    "micro-rituals",
                    "- נר דולק\n- נשימה מודעת\n- הליכה איטית",
                )
            }
            .into(),
        ],
        EntityKind::Tip => vec![
            Tip {
                tags: tags(&["דיגיטל דיטוקס"]),
                ..Tip::new("כבה התראות לשעה", "הטלפון לא ייעלם, הרגע כן.")
            }
            .into(),
            Tip {
                tags: tags(&["מודעות"]),
                ..Tip::new("צא להליכה בלי אוזניות", "תן לעולם להלחין.")
            }
            .into(),
        ],
        EntityKind::Challenge => vec![
            Challenge {
                duration_days: 1,
                tags: tags(&["דיגיטל דיטוקס"]),
                ..Challenge::new("24 שעות ללא רשתות", "שמור על סקרנות ללא גלילה")
            }
            .into(),
            Challenge {
                duration_days: 7,
                ..Challenge::new("7 ימים של סקרנות איטית", "כל יום טקס קטן אחד")
            }
            .into(),
        ],
        EntityKind::EbookTest => vec![EbookTest {
            description: Some("מבחן קצר למציאת הקריאה הבאה".to_string()),
            questions: tags(&[
                "מה מושך אותך יותר: פילוסופיה או פרקטיקה?",
                "כמה זמן יש לך ליום?",
            ]),
            recommended_reads: tags(&["Digital Minimalism", "How To Do Nothing"]),
            tags: tags(&["המלצות"]),
            ..EbookTest::new("איזה ספר עזר לך להאט?")
        }
        .into()],
    }
}

/// Seed every empty collection, in fixed order
pub async fn seed_demo(service: &ContentService) -> Result<SeedReport, ServerError> {
    let mut inserted = BTreeMap::new();

    for kind in EntityKind::ALL {
        let existing = service
            .store()
            .count(kind.collection(), &Filter::new())
            .await?;

        let mut count = 0;
        if existing == 0 {
            for entity in demo_entities(kind) {
                service.create_entity(entity).await?;
                count += 1;
            }
            info!(collection = kind.collection(), count, "seeded demo content");
        }

        inserted.insert(kind.plural(), count);
    }

    Ok(SeedReport { inserted })
}
