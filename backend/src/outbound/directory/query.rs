//! Filtering, ordering and paging over the in-memory user list.

use std::cmp::Ordering;

use crate::domain::ports::UserPage;
use crate::domain::{OrderBy, SortOrder, UserQueryArgs, UserRecord};

pub(super) fn run(users: &[UserRecord], args: &UserQueryArgs) -> UserPage {
    let needle = args
        .search
        .as_deref()
        .map(|term| term.trim().to_lowercase())
        .filter(|term| !term.is_empty());

    let mut matched: Vec<&UserRecord> = users
        .iter()
        .filter(|user| args.role.as_deref().is_none_or(|role| user.has_role(role)))
        .filter(|user| needle.as_deref().is_none_or(|term| matches_search(user, term)))
        .collect();

    matched.sort_by(|a, b| {
        let ordering = compare(a, b, args.order_by).then_with(|| a.id().get().cmp(&b.id().get()));
        match args.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    let total = matched.len();
    let skip = usize::try_from(args.offset).unwrap_or(usize::MAX);
    let take = if args.is_unlimited() {
        usize::MAX
    } else {
        usize::try_from(args.number).unwrap_or(usize::MAX)
    };
    UserPage {
        users: matched.into_iter().skip(skip).take(take).cloned().collect(),
        total,
    }
}

fn matches_search(user: &UserRecord, term: &str) -> bool {
    [user.login().to_owned(), user.email().to_owned(), user.full_name()]
        .iter()
        .any(|field| field.to_lowercase().contains(term))
}

fn compare(a: &UserRecord, b: &UserRecord, order_by: OrderBy) -> Ordering {
    match order_by {
        OrderBy::Login => a.login().cmp(b.login()),
        OrderBy::Email => a.email().cmp(b.email()),
        OrderBy::Id => a.id().get().cmp(&b.id().get()),
        OrderBy::Name => a.full_name().to_lowercase().cmp(&b.full_name().to_lowercase()),
    }
}
