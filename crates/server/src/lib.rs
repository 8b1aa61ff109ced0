use local_deployment::LocalDeployment;

pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;
#[cfg(test)]
pub mod test_support;

pub type DeploymentImpl = LocalDeployment;
