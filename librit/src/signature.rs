use crate::error::{RitGenericError, RitResult};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

#[derive(PartialEq, Clone, Debug, Hash, Ord, PartialOrd, Eq, Copy)]
pub struct RitEpochTime(i64);

impl RitEpochTime {
    pub fn new(i: i64) -> Self {
        Self(i)
    }

    pub fn as_secs(self) -> i64 {
        self.0
    }
}

/// timezone offset in minutes
#[derive(PartialEq, Clone, Debug, Hash, Ord, PartialOrd, Eq, Copy)]
pub struct RitTimeZoneOffset(i32);

impl RitTimeZoneOffset {
    pub fn new(offset: i32) -> Self {
        Self(offset)
    }

    pub fn minutes(self) -> i32 {
        self.0
    }
}

#[derive(PartialEq, Clone, Debug, PartialOrd, Eq, Ord, Hash, Copy)]
pub struct RitTime {
    pub time: RitEpochTime,
    pub offset: RitTimeZoneOffset,
}

#[cfg(test)]
static TEST_TICK: std::sync::atomic::AtomicI64 = std::sync::atomic::AtomicI64::new(1);

impl RitTime {
    pub fn now() -> Self {
        // tests need commit timestamps that are deterministic yet strictly
        // increasing (merge-base picks the most recent common ancestor)
        #[cfg(test)]
        {
            let tick = TEST_TICK.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Self { time: RitEpochTime(tick), offset: RitTimeZoneOffset(0) }
        }
        #[cfg(not(test))]
        {
            use chrono::Offset;
            let now = chrono::offset::Local::now();
            let offset = RitTimeZoneOffset(now.offset().fix().local_minus_utc() / 60);
            let time = RitEpochTime(now.timestamp());
            Self { time, offset }
        }
    }
}

#[derive(PartialEq, Clone, Debug)]
pub struct RitSignature {
    pub name: String,
    pub email: String,
    pub time: RitTime,
}

impl FromStr for RitTimeZoneOffset {
    type Err = RitGenericError;

    // format: (+|-)hhmm
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sign = match &s[0..1] {
            "+" => 1,
            "-" => -1,
            _ => bail!("invalid timezone format `{}`", s),
        };
        let hours: i32 = s[1..3].parse()?;
        let minutes: i32 = s[3..5].parse()?;
        Ok(Self(sign * (minutes + hours * 60)))
    }
}

impl FromStr for RitEpochTime {
    type Err = RitGenericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl FromStr for RitTime {
    type Err = RitGenericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (time, offset) =
            s.split_once(' ').ok_or_else(|| anyhow!("malformed timestamp `{}`", s))?;
        Ok(Self { time: time.parse()?, offset: offset.parse()? })
    }
}

impl FromStr for RitSignature {
    type Err = RitGenericError;

    // A User <a.user@example.com> 1616061862 +1300
    fn from_str(s: &str) -> RitResult<Self> {
        let email_start = s.find('<').ok_or_else(|| anyhow!("malformed signature `{}`", s))?;
        let email_end = s.find('>').ok_or_else(|| anyhow!("malformed signature `{}`", s))?;
        ensure!(email_start > 0 && email_end > email_start, "malformed signature `{}`", s);

        let name = s[..email_start - 1].to_owned();
        let email = s[email_start + 1..email_end].to_owned();
        let time = s[email_end + 1..].trim_start().parse()?;
        Ok(Self { name, email, time })
    }
}

impl Display for RitEpochTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for RitTimeZoneOffset {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sign = if self.0 >= 0 { '+' } else { '-' };
        let offset = self.0.abs();
        write!(f, "{}{:02}{:02}", sign, offset / 60, offset % 60)
    }
}

impl Display for RitTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.time, self.offset)
    }
}

impl Display for RitSignature {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> {}", self.name, self.email, self.time)
    }
}
