use super::{Endpoint, EndpointKind};
use crate::error::FetchError;
use crate::mapper::Record;
use crate::metrics::{Gauge, Histogram, Target};
use crate::upstream::responses::{CategoriesResponse, MetricField};
use crate::upstream::TimeWindow;

fn require_categories(response: &CategoriesResponse) -> Result<(), FetchError> {
    match response.categories {
        Some(_) => Ok(()),
        None => Err(FetchError::Incomplete("categories")),
    }
}

fn category_records(response: &CategoriesResponse, metric: MetricField) -> Vec<Record> {
    response
        .categories
        .iter()
        .flatten()
        .map(|c| Record::new(c.name.clone(), c.metrics.get(metric)))
        .collect()
}

/// `analytical/top100`: today's busiest paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopPaths;

impl Endpoint for TopPaths {
    type Response = CategoriesResponse;

    fn kind(&self) -> EndpointKind {
        EndpointKind::TopPaths
    }

    fn path(&self) -> &'static str {
        "/reports/v1/analytical/top100"
    }

    fn window(&self) -> TimeWindow {
        TimeWindow::Date
    }

    fn metric(&self) -> MetricField {
        MetricField::RealtimeRequests
    }

    fn target(&self) -> Target {
        Target::Gauge(Gauge::RequestsByPath)
    }

    fn histogram(&self) -> Option<Histogram> {
        Some(Histogram::RequestsTotal)
    }

    fn validate(&self, response: &CategoriesResponse) -> Result<(), FetchError> {
        require_categories(response)
    }

    fn records(&self, response: &CategoriesResponse) -> Vec<Record> {
        category_records(response, self.metric())
    }
}

/// `analytical/httpstatuses`: today's requests per status code.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpStatuses;

impl Endpoint for HttpStatuses {
    type Response = CategoriesResponse;

    fn kind(&self) -> EndpointKind {
        EndpointKind::HttpStatuses
    }

    fn path(&self) -> &'static str {
        "/reports/v1/analytical/httpstatuses"
    }

    fn window(&self) -> TimeWindow {
        TimeWindow::FullDay
    }

    fn metric(&self) -> MetricField {
        MetricField::RealtimeRequests
    }

    fn target(&self) -> Target {
        Target::Gauge(Gauge::RequestsByCode)
    }

    fn validate(&self, response: &CategoriesResponse) -> Result<(), FetchError> {
        require_categories(response)
    }

    fn records(&self, response: &CategoriesResponse) -> Vec<Record> {
        category_records(response, self.metric())
    }
}
