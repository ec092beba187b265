//! Introspection bindings for the club domain.
//!
//! Describes the fields and the public operations of every domain type and
//! registers one canonical default value per type. Validated inputs are read
//! with the `checked_*` accessors, so an absent argument surfaces as
//! `IllegalArgument` just as the domain rejects an empty name. `parse` reads
//! its input raw and is excluded from null-argument probing.

use crate::domain::{ClubError, Level, Member, Sports, SportsClub, SportsMap, Trainer};
use probe_core::{Catalog, ConfigError, Shape, TargetError, TypeExpr, TypeInfo, Value};
use std::collections::BTreeSet;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;

pub const LEVEL: &str = "Level";
pub const SPORTS: &str = "Sports";
pub const MEMBER: &str = "Member";
pub const SPORTS_CLUB: &str = "SportsClub";
pub const TRAINER: &str = "Trainer";
pub const SPORTS_MAP: &str = "BTreeMap<Sports, Level>";
pub const SPORTS_SET: &str = "BTreeSet<Sports>";
pub const MEMBER_SET: &str = "BTreeSet<Member>";

/// Fee per sports of the default club, in cents.
pub const DEFAULT_FEE: i64 = 1000;

impl From<ClubError> for TargetError {
    fn from(err: ClubError) -> Self {
        TargetError::illegal_argument(err.to_string())
    }
}

fn level_value(level: Level) -> Value {
    Value::object(LEVEL, level)
}

fn sports_value(sports: Sports) -> Value {
    Value::object(SPORTS, sports)
}

fn member_value(member: Member) -> Value {
    Value::object(MEMBER, member)
}

fn club_value(club: SportsClub) -> Value {
    Value::object(SPORTS_CLUB, club)
}

fn trainer_value(trainer: Trainer) -> Value {
    Value::object(TRAINER, trainer)
}

/// The member behind a `Member` or `Trainer` receiver.
fn member_of(this: &Value) -> Result<&Member, TargetError> {
    match this.downcast_ref::<Trainer>() {
        Ok(trainer) => Ok(trainer.as_member()),
        Err(_) => this.downcast_ref::<Member>(),
    }
}

fn member_of_mut(this: &mut Value) -> Result<&mut Member, TargetError> {
    if this.downcast_ref::<Trainer>().is_ok() {
        return this.downcast_mut::<Trainer>().map(Trainer::as_member_mut);
    }
    this.downcast_mut::<Member>()
}

fn reference(name: &str) -> Shape {
    Shape::reference(name)
}

fn generic(name: &str, args: &[&str]) -> TypeExpr {
    TypeExpr::generic(name, args.iter().map(|a| TypeExpr::simple(*a)).collect())
}

/// Hash of a value as the signed integer handed to probes.
pub fn hash_of<T: Hash>(value: &T) -> i64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish() as i64
}

fn level_info() -> TypeInfo {
    let mut info = TypeInfo::new(LEVEL);
    for level in Level::ALL {
        info = info.static_field(level.constant_name(), TypeExpr::simple(LEVEL));
    }
    info.static_method("parse", vec![Shape::string()], reference(LEVEL), |args| {
        let level: Level = args.str(0)?.parse()?;
        Ok(level_value(level))
    })
    .method("mapped_name", vec![], Shape::string(), |this, _| {
        Ok(Value::from(this.downcast_ref::<Level>()?.mapped_name()))
    })
    .method("next", vec![], reference(LEVEL), |this, _| {
        Ok(level_value(this.downcast_ref::<Level>()?.next()))
    })
    .method("to_string", vec![], Shape::string(), |this, _| {
        Ok(Value::from(this.downcast_ref::<Level>()?.to_string()))
    })
}

fn sports_info() -> TypeInfo {
    let mut info = TypeInfo::new(SPORTS);
    for sports in Sports::ALL {
        info = info.static_field(sports.constant_name(), TypeExpr::simple(SPORTS));
    }
    info.static_method("parse", vec![Shape::string()], reference(SPORTS), |args| {
        let sports: Sports = args.str(0)?.parse()?;
        Ok(sports_value(sports))
    })
    .method("fee_factor", vec![], Shape::i64(), |this, _| {
        Ok(Value::from(this.downcast_ref::<Sports>()?.fee_factor()))
    })
    .method("fee", vec![Shape::i64()], Shape::i64(), |this, args| {
        let fee_per_sports = args.i64(0)?;
        Ok(Value::from(this.downcast_ref::<Sports>()?.fee(fee_per_sports)))
    })
    .method("to_string", vec![], Shape::string(), |this, _| {
        Ok(Value::from(this.downcast_ref::<Sports>()?.to_string()))
    })
}

fn member_info() -> TypeInfo {
    TypeInfo::new(MEMBER)
        .field("name", TypeExpr::simple("String"))
        .field("sports", generic("BTreeMap", &[SPORTS, LEVEL]))
        .constructor("new", vec![Shape::string()], |args| {
            Ok(member_value(Member::new(args.checked_str(0, "name")?)?))
        })
        .constructor(
            "with_sports",
            vec![Shape::string(), reference(SPORTS_MAP)],
            |args| {
                let name = args.checked_str(0, "name")?;
                let sports = args.checked_object::<SportsMap>(1, "sports")?;
                Ok(member_value(Member::with_sports(name, sports)?))
            },
        )
        .method("name", vec![], Shape::string(), |this, _| {
            Ok(Value::from(member_of(this)?.name()))
        })
        .method("sports", vec![], reference(SPORTS_MAP), |this, _| {
            Ok(Value::object(SPORTS_MAP, member_of(this)?.sports()))
        })
        .method("billable_sports", vec![], reference(SPORTS_SET), |this, _| {
            Ok(Value::object(
                SPORTS_SET,
                member_of(this)?.billable_sports(),
            ))
        })
        .method(
            "learn",
            vec![reference(SPORTS), reference(LEVEL)],
            reference(LEVEL),
            |this, args| {
                let sports = *args.checked_object::<Sports>(0, "sports")?;
                let level = *args.checked_object::<Level>(1, "level")?;
                Ok(level_value(member_of_mut(this)?.learn(sports, level)))
            },
        )
        .method("to_string", vec![], Shape::string(), |this, _| {
            Ok(Value::from(member_of(this)?.to_string()))
        })
        .method("equals", vec![reference(MEMBER)], Shape::bool(), |this, args| {
            let this = member_of(this)?;
            let equal = match args.get(0)? {
                Value::Null => false,
                other => other.downcast_ref::<Member>()? == this,
            };
            Ok(Value::Bool(equal))
        })
        .method("cmp", vec![reference(MEMBER)], Shape::i32(), |this, args| {
            let other = args.checked_object::<Member>(0, "other")?;
            Ok(Value::from(member_of(this)?.cmp(other) as i32))
        })
        .method("hash", vec![], Shape::i64(), |this, _| {
            Ok(Value::from(hash_of(member_of(this)?)))
        })
}

fn trainer_info() -> TypeInfo {
    TypeInfo::new(TRAINER)
        .supertype(MEMBER)
        .field("member", TypeExpr::simple(MEMBER))
        .field("accreditations", generic("BTreeMap", &[SPORTS, LEVEL]))
        .constructor(
            "new",
            vec![Shape::string(), reference(SPORTS_MAP)],
            |args| {
                let name = args.checked_str(0, "name")?;
                let accreditations = args.checked_object::<SportsMap>(1, "accreditations")?;
                Ok(trainer_value(Trainer::new(name, accreditations)?))
            },
        )
        .method("accreditations", vec![], reference(SPORTS_MAP), |this, _| {
            Ok(Value::object(
                SPORTS_MAP,
                this.downcast_ref::<Trainer>()?.accreditations(),
            ))
        })
        .method("billable_sports", vec![], reference(SPORTS_SET), |this, _| {
            Ok(Value::object(
                SPORTS_SET,
                this.downcast_ref::<Trainer>()?.billable_sports(),
            ))
        })
        .method("to_string", vec![], Shape::string(), |this, _| {
            Ok(Value::from(this.downcast_ref::<Trainer>()?.to_string()))
        })
}

fn club_info() -> TypeInfo {
    TypeInfo::new(SPORTS_CLUB)
        .field("name", TypeExpr::simple("String"))
        .field("members", generic("BTreeMap", &["String", MEMBER]))
        .field("offered_sports", generic("BTreeMap", &[SPORTS, LEVEL]))
        .field("fee_per_sports", TypeExpr::simple("i64"))
        .constructor("new", vec![Shape::string(), Shape::i64()], |args| {
            let name = args.checked_str(0, "name")?;
            Ok(club_value(SportsClub::new(name, args.i64(1)?)?))
        })
        .method("name", vec![], Shape::string(), |this, _| {
            Ok(Value::from(this.downcast_ref::<SportsClub>()?.name()))
        })
        .method("fee_per_sports", vec![], Shape::i64(), |this, _| {
            Ok(Value::from(this.downcast_ref::<SportsClub>()?.fee_per_sports()))
        })
        .method("members", vec![], reference(MEMBER_SET), |this, _| {
            Ok(Value::object(
                MEMBER_SET,
                this.downcast_ref::<SportsClub>()?.members(),
            ))
        })
        .method("member", vec![Shape::string()], reference(MEMBER), |this, args| {
            let name = args.checked_str(0, "name")?;
            Ok(this
                .downcast_ref::<SportsClub>()?
                .member(name)
                .cloned()
                .map_or(Value::Null, member_value))
        })
        .method("sports", vec![], reference(SPORTS_SET), |this, _| {
            Ok(Value::object(
                SPORTS_SET,
                this.downcast_ref::<SportsClub>()?.sports(),
            ))
        })
        .method(
            "offer",
            vec![reference(SPORTS), reference(LEVEL)],
            Shape::bool(),
            |this, args| {
                let sports = *args.checked_object::<Sports>(0, "sports")?;
                let level = *args.checked_object::<Level>(1, "level")?;
                Ok(Value::Bool(
                    this.downcast_mut::<SportsClub>()?.offer(sports, level),
                ))
            },
        )
        .method("add_member", vec![reference(MEMBER)], Shape::bool(), |this, args| {
            let member = args.checked_object::<Member>(0, "member")?.clone();
            Ok(Value::Bool(
                this.downcast_mut::<SportsClub>()?.add_member(member),
            ))
        })
        .method("remove_member", vec![reference(MEMBER)], Shape::bool(), |this, args| {
            let member = args.checked_object::<Member>(0, "member")?;
            Ok(Value::Bool(
                this.downcast_mut::<SportsClub>()?.remove_member(member),
            ))
        })
        .method(
            "calculate_membership_fee",
            vec![reference(MEMBER)],
            Shape::i64(),
            |this, args| {
                let member = args.checked_object::<Member>(0, "member")?;
                Ok(Value::from(
                    this.downcast_ref::<SportsClub>()?
                        .calculate_membership_fee(member)?,
                ))
            },
        )
        .method(
            "register_sports",
            vec![reference(MEMBER), reference(SPORTS), reference(LEVEL)],
            Shape::bool(),
            |this, args| {
                let member = args.checked_object::<Member>(0, "member")?;
                let sports = *args.checked_object::<Sports>(1, "sports")?;
                let level = *args.checked_object::<Level>(2, "level")?;
                Ok(Value::Bool(
                    this.downcast_mut::<SportsClub>()?
                        .register_sports(member, sports, level)?,
                ))
            },
        )
        .method("to_string", vec![], Shape::string(), |this, _| {
            Ok(Value::from(this.downcast_ref::<SportsClub>()?.to_string()))
        })
}

fn default_member() -> Value {
    Member::new("Hans").map_or(Value::Null, member_value)
}

/// `Tina`, accredited for golf at the normal level.
fn default_trainer() -> Value {
    let accreditations = SportsMap::from([(Sports::Golf, Level::Normal)]);
    Trainer::new("Tina", &accreditations).map_or(Value::Null, trainer_value)
}

/// `Club`, offering archery up to the professional level, with `Hans` as
/// its only member.
fn default_club() -> Value {
    SportsClub::new("Club", DEFAULT_FEE).map_or(Value::Null, |mut club| {
        club.offer(Sports::Archery, Level::Professional);
        if let Ok(hans) = Member::new("Hans") {
            club.add_member(hans);
        }
        club_value(club)
    })
}

/// Builds the catalog of the club domain.
pub fn catalog() -> Result<Arc<Catalog>, ConfigError> {
    Catalog::builder()
        .register_type(level_info())
        .register_type(sports_info())
        .register_type(member_info())
        .register_type(club_info())
        .register_type(trainer_info())
        .register_default(LEVEL, || level_value(Level::Beginner))
        .register_default(SPORTS, || sports_value(Sports::Archery))
        .register_default(MEMBER, default_member)
        .register_default(SPORTS_CLUB, default_club)
        .register_default(TRAINER, default_trainer)
        .register_default(SPORTS_MAP, || Value::object(SPORTS_MAP, SportsMap::new()))
        .register_default(SPORTS_SET, || {
            Value::object(SPORTS_SET, BTreeSet::<Sports>::new())
        })
        .register_default(MEMBER_SET, || {
            Value::object(MEMBER_SET, BTreeSet::<Member>::new())
        })
        .build()
}
