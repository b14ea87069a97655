// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt;

use log::debug;
use serde::Deserialize;

use directory_auth_core::{Context, Error, Result};

use crate::constants::{
    DEFAULT_MAX_RESULTS, GOOGLE_DIRECTORY_CUSTOMER, GOOGLE_DIRECTORY_MAX_RESULTS,
    MAX_RESULTS_LIMIT, MY_CUSTOMER,
};

/// A user account of the directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    /// Unique id of the user.
    pub id: String,
    /// Primary email address.
    pub primary_email: String,
    /// Names of the user.
    pub name: UserName,
    /// Whether the user is a super administrator.
    pub is_admin: bool,
    /// Whether the user is suspended.
    pub suspended: bool,
}

/// Prints `{full_name}, {primary_email}, {id}`.
impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}",
            self.name.full_name, self.primary_email, self.id
        )
    }
}

/// Names of a [`User`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserName {
    /// Given name and family name joined.
    pub full_name: String,
    /// First name.
    pub given_name: String,
    /// Last name.
    pub family_name: String,
}

/// One page of `users.list`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UsersPage {
    /// Users of this page, empty if the directory returned none.
    pub users: Vec<User>,
    /// Token of the next page, if any.
    pub next_page_token: Option<String>,
}

/// Parameters of `users.list`.
///
/// Defaults to the `my_customer` alias and a page of 10 users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListUsersRequest {
    customer: Option<String>,
    domain: Option<String>,
    max_results: u32,
    query: Option<String>,
    order_by: Option<String>,
    page_token: Option<String>,
}

impl Default for ListUsersRequest {
    fn default() -> Self {
        Self {
            customer: Some(MY_CUSTOMER.to_string()),
            domain: None,
            max_results: DEFAULT_MAX_RESULTS,
            query: None,
            order_by: None,
            page_token: None,
        }
    }
}

impl ListUsersRequest {
    /// Create a request for the first page of `my_customer`.
    pub fn new() -> Self {
        Self::default()
    }

    /// List users of the given customer id.
    pub fn with_customer(mut self, customer: impl Into<String>) -> Self {
        self.customer = Some(customer.into());
        self
    }

    /// List users of a single domain instead of the whole customer.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self.customer = None;
        self
    }

    /// Set the page size. The API accepts 1 to 500.
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results.clamp(1, MAX_RESULTS_LIMIT);
        self
    }

    /// Filter with the directory search syntax, e.g. `isAdmin=true`.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Sort by `email`, `familyName` or `givenName`.
    pub fn with_order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    /// Continue from a previous [`UsersPage::next_page_token`].
    pub fn with_page_token(mut self, token: impl Into<String>) -> Self {
        self.page_token = Some(token.into());
        self
    }

    /// Load customer and page size from env.
    pub fn from_env(ctx: &Context) -> Result<Self> {
        let mut req = Self::new();

        if let Some(v) = ctx.env_var(GOOGLE_DIRECTORY_CUSTOMER) {
            if !v.trim().is_empty() {
                req = req.with_customer(v.trim());
            }
        }

        if let Some(v) = ctx.env_var(GOOGLE_DIRECTORY_MAX_RESULTS) {
            let n: u32 = v.trim().parse().map_err(|e| {
                Error::config_invalid(format!(
                    "env {GOOGLE_DIRECTORY_MAX_RESULTS} must be a positive number, got {v}"
                ))
                .with_source(e)
            })?;
            req = req.with_max_results(n);
        }

        debug!("loaded list users request from env: {req:?}");
        Ok(req)
    }

    /// The customer selector, if any.
    pub fn customer(&self) -> Option<&str> {
        self.customer.as_deref()
    }

    /// The domain selector, if any.
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// The page size.
    pub fn max_results(&self) -> u32 {
        self.max_results
    }

    /// Either a customer or a domain must be selected.
    pub fn validate(&self) -> Result<()> {
        let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
        if blank(&self.customer) && blank(&self.domain) {
            return Err(Error::request_invalid(
                "either customer or domain must be set to list users",
            ));
        }
        Ok(())
    }

    pub(crate) fn query_string(&self) -> String {
        let mut s = form_urlencoded::Serializer::new(String::new());
        if let Some(v) = &self.customer {
            s.append_pair("customer", v);
        }
        if let Some(v) = &self.domain {
            s.append_pair("domain", v);
        }
        s.append_pair("maxResults", &self.max_results.to_string());
        if let Some(v) = &self.query {
            s.append_pair("query", v);
        }
        if let Some(v) = &self.order_by {
            s.append_pair("orderBy", v);
        }
        if let Some(v) = &self.page_token {
            s.append_pair("pageToken", v);
        }
        s.finish()
    }
}
