pub(crate) mod kong;

pub(crate) use kong::KongAdminClient;
