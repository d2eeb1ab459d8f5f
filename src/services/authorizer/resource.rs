//! `Resource` of the granted policy statement.
//!
//! The default grant covers every API, stage and method in the configured
//! region. The narrower scopes take the method ARN of the request being
//! authorized and grant either its API stage or exactly that method.

use std::str::FromStr;

use crate::services::authorizer::error::AuthorizeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResourceScope {
    /// `arn:aws:execute-api:{region}:**`
    #[default]
    Region,
    /// `arn:{partition}:execute-api:{region}:{account}:{api_id}/{stage}/*/*`
    Api,
    /// The method ARN of the request, verbatim.
    Method,
}

impl FromStr for ResourceScope {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "region" => Ok(Self::Region),
            "api" => Ok(Self::Api),
            "method" => Ok(Self::Method),
            _ => Err(()),
        }
    }
}

/// Parsed `arn:{partition}:execute-api:{region}:{account}:{api_id}/{stage}/{verb}[/{path}]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodArn<'a> {
    pub partition: &'a str,
    pub region: &'a str,
    pub account: &'a str,
    pub api_id: &'a str,
    pub stage: &'a str,
    pub verb: &'a str,
    pub path: Option<&'a str>,
}

impl<'a> MethodArn<'a> {
    pub fn parse(arn: &'a str) -> Option<Self> {
        let mut fields = arn.splitn(6, ':');
        let (prefix, partition, service, region, account, rest) = (
            fields.next()?,
            fields.next()?,
            fields.next()?,
            fields.next()?,
            fields.next()?,
            fields.next()?,
        );
        if prefix != "arn" || service != "execute-api" {
            return None;
        }

        let mut segments = rest.splitn(4, '/');
        let api_id = segments.next()?;
        let stage = segments.next()?;
        let verb = segments.next()?;
        let path = segments.next().filter(|p| !p.is_empty());

        let required = [partition, region, account, api_id, stage, verb];
        if required.iter().any(|s| s.is_empty()) {
            return None;
        }

        Some(Self {
            partition,
            region,
            account,
            api_id,
            stage,
            verb,
            path,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ResourcePolicy {
    region: String,
    scope: ResourceScope,
    region_pattern: String,
}

impl ResourcePolicy {
    pub fn new(region: impl Into<String>, scope: ResourceScope) -> Self {
        let region = region.into();
        let region_pattern = format!("arn:aws:execute-api:{}:**", region);
        Self {
            region,
            scope,
            region_pattern,
        }
    }

    /// Resource string to grant for a request against `method_arn`.
    ///
    /// Under `Region` scope the method ARN is not looked at.
    pub fn resource_for(&self, method_arn: &str) -> Result<String, AuthorizeError> {
        if self.scope == ResourceScope::Region {
            return Ok(self.region_pattern.clone());
        }

        let arn = MethodArn::parse(method_arn).ok_or_else(|| {
            AuthorizeError::InvalidResource(format!("unparseable method ARN {method_arn:?}"))
        })?;
        if arn.region != self.region {
            return Err(AuthorizeError::InvalidResource(format!(
                "method ARN region {} does not match {}",
                arn.region, self.region
            )));
        }

        Ok(match self.scope {
            ResourceScope::Api => format!(
                "arn:{}:execute-api:{}:{}:{}/{}/*/*",
                arn.partition, arn.region, arn.account, arn.api_id, arn.stage
            ),
            _ => method_arn.to_string(),
        })
    }
}
